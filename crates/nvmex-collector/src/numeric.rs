use serde_json::Value;

const THOUSANDS_SEPARATOR: char = ',';

/// Reads a smart-log value that is either a JSON number or a string such as `"1,234,567"`.
pub fn to_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.replace(THOUSANDS_SEPARATOR, "").parse::<f64>().ok(),
        _ => None,
    }
}

/// Like [`to_numeric`], with unparseable values read as `0.0`.
pub fn normalize(value: &Value) -> f64 {
    to_numeric(value).unwrap_or(0.0)
}

pub fn kelvin_to_fahrenheit(kelvin: f64) -> f64 {
    (kelvin - 273.15) * 9.0 / 5.0 + 32.0
}
