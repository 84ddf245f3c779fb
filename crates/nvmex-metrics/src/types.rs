#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
}

impl MetricType {
    pub fn as_prometheus_type(&self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
        }
    }

    pub fn value(&self, value: f64) -> MetricValue {
        match self {
            Self::Counter => MetricValue::Counter(value),
            Self::Gauge => MetricValue::Gauge(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricDescriptor {
    pub name: String,
    pub help: String,
    pub metric_type: MetricType,
    pub variable_labels: Vec<String>,
}

impl MetricDescriptor {
    pub fn new(name: &str, help: &str, metric_type: MetricType, variable_labels: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            metric_type,
            variable_labels: variable_labels.iter().map(|label| (*label).to_string()).collect(),
        }
    }

    /// Builds a sample of this descriptor's type, pairing label names with `label_values`
    /// by position. Missing values become empty strings.
    pub fn sample(&self, label_values: &[&str], value: f64) -> MetricSample {
        MetricSample {
            labels: self
                .variable_labels
                .iter()
                .enumerate()
                .map(|(index, name)| {
                    (
                        name.clone(),
                        label_values.get(index).copied().unwrap_or_default().to_string(),
                    )
                })
                .collect(),
            value: self.metric_type.value(value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Counter(f64),
    Gauge(f64),
}

impl MetricValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Counter(value) | Self::Gauge(value) => *value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub labels: Vec<(String, String)>,
    pub value: MetricValue,
}

impl MetricSample {
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A single sample bound to its static descriptor.
#[derive(Debug, Clone)]
pub struct MetricPoint {
    pub descriptor: &'static MetricDescriptor,
    pub sample: MetricSample,
}

#[derive(Debug, Clone)]
pub struct MetricFamily {
    pub descriptor: MetricDescriptor,
    pub samples: Vec<MetricSample>,
}
