use crate::types::MetricFamily;

/// Renders families in the Prometheus text exposition format (version 0.0.4).
pub fn render_prometheus(families: &[MetricFamily]) -> String {
    let mut output = String::new();

    for family in families {
        if family.samples.is_empty() {
            continue;
        }

        output.push_str("# HELP ");
        output.push_str(&family.descriptor.name);
        output.push(' ');
        output.push_str(&escape_help(&family.descriptor.help));
        output.push('\n');

        output.push_str("# TYPE ");
        output.push_str(&family.descriptor.name);
        output.push(' ');
        output.push_str(family.descriptor.metric_type.as_prometheus_type());
        output.push('\n');

        for sample in &family.samples {
            output.push_str(&render_sample_line(
                &family.descriptor.name,
                &sample.labels,
                sample.value.as_f64(),
            ));
        }
    }

    output
}

fn render_sample_line(name: &str, labels: &[(String, String)], value: f64) -> String {
    let mut rendered = String::new();
    rendered.push_str(name);

    if !labels.is_empty() {
        rendered.push('{');
        for (index, (key, value)) in labels.iter().enumerate() {
            if index > 0 {
                rendered.push(',');
            }
            rendered.push_str(key);
            rendered.push_str("=\"");
            rendered.push_str(&escape_label_value(value));
            rendered.push('"');
        }
        rendered.push('}');
    }

    rendered.push(' ');
    rendered.push_str(&format_metric_value(value));
    rendered.push('\n');
    rendered
}

fn format_metric_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn escape_help(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('"', "\\\"")
}
