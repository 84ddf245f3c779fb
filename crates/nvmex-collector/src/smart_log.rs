//! Translation of `nvme smart-log` records into labeled metric points.
//!
//! Field descriptions follow the SMART / Health Information log page of the
//! NVM Express Base Specification 2.0. Temperatures are exposed in degrees
//! Fahrenheit; the device reports them in Kelvin.

use std::sync::LazyLock;

use nvmex_common::error::{NvmexError, Result};
use nvmex_metrics::{MetricDescriptor, MetricPoint, MetricType};
use serde_json::{Map, Value};
use tracing::warn;

use crate::{
    device::DeviceDescriptor,
    numeric::{kelvin_to_fahrenheit, to_numeric},
    runner::CommandRunner,
};

pub const DEVICE_LABELS: [&str; 2] = ["device", "model"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Raw,
    KelvinToFahrenheit,
}

impl Unit {
    fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Raw => value,
            Self::KelvinToFahrenheit => kelvin_to_fahrenheit(value),
        }
    }
}

/// One smart-log key and the metric it is exported as.
#[derive(Debug, Clone, Copy)]
pub struct SmartField {
    pub key: &'static str,
    pub metric: &'static str,
    pub help: &'static str,
    pub metric_type: MetricType,
    pub unit: Unit,
}

const fn gauge(key: &'static str, metric: &'static str, help: &'static str) -> SmartField {
    SmartField {
        key,
        metric,
        help,
        metric_type: MetricType::Gauge,
        unit: Unit::Raw,
    }
}

const fn counter(key: &'static str, metric: &'static str, help: &'static str) -> SmartField {
    SmartField {
        key,
        metric,
        help,
        metric_type: MetricType::Counter,
        unit: Unit::Raw,
    }
}

pub const SMART_FIELDS: [SmartField; 22] = [
    gauge(
        "critical_warning",
        "nvme_critical_warning",
        "Critical warnings for the state of the controller",
    ),
    SmartField {
        key: "temperature",
        metric: "nvme_temperature",
        help: "Temperature in degrees fahrenheit",
        metric_type: MetricType::Gauge,
        unit: Unit::KelvinToFahrenheit,
    },
    gauge(
        "avail_spare",
        "nvme_avail_spare",
        "Normalized percentage of remaining spare capacity available",
    ),
    gauge(
        "spare_thresh",
        "nvme_spare_thresh",
        "Async event completion may occur when avail spare < threshold",
    ),
    gauge(
        "percent_used",
        "nvme_percent_used",
        "Vendor specific estimate of the percentage of life used",
    ),
    gauge(
        "endurance_grp_critical_warning_summary",
        "nvme_endurance_grp_critical_warning_summary",
        "Critical warnings for the state of endurance groups",
    ),
    counter(
        "data_units_read",
        "nvme_data_units_read",
        "Number of 512 byte data units host has read",
    ),
    counter(
        "data_units_written",
        "nvme_data_units_written",
        "Number of 512 byte data units the host has written",
    ),
    counter(
        "host_read_commands",
        "nvme_host_read_commands",
        "Number of read commands completed",
    ),
    counter(
        "host_write_commands",
        "nvme_host_write_commands",
        "Number of write commands completed",
    ),
    counter(
        "controller_busy_time",
        "nvme_controller_busy_time",
        "Amount of time in minutes controller busy with IO commands",
    ),
    counter("power_cycles", "nvme_power_cycles", "Number of power cycles"),
    counter("power_on_hours", "nvme_power_on_hours", "Number of power on hours"),
    counter(
        "unsafe_shutdowns",
        "nvme_unsafe_shutdowns",
        "Number of unsafe shutdowns",
    ),
    counter(
        "media_errors",
        "nvme_media_errors",
        "Number of unrecovered data integrity errors",
    ),
    counter(
        "num_err_log_entries",
        "nvme_num_err_log_entries",
        "Lifetime number of error log entries",
    ),
    counter(
        "warning_temp_time",
        "nvme_warning_temp_time",
        "Amount of time in minutes temperature > warning threshold",
    ),
    counter(
        "critical_comp_time",
        "nvme_critical_comp_time",
        "Amount of time in minutes temperature > critical threshold",
    ),
    counter(
        "thm_temp1_trans_count",
        "nvme_thm_temp1_trans_count",
        "Number of times controller transitioned to lower power",
    ),
    counter(
        "thm_temp2_trans_count",
        "nvme_thm_temp2_trans_count",
        "Number of times controller transitioned to lower power",
    ),
    counter(
        "thm_temp1_total_time",
        "nvme_thm_temp1_trans_time",
        "Total number of seconds controller transitioned to lower power",
    ),
    counter(
        "thm_temp2_total_time",
        "nvme_thm_temp2_trans_time",
        "Total number of seconds controller transitioned to lower power",
    ),
];

// Indexed like SMART_FIELDS.
static SMART_DESCRIPTORS: LazyLock<Vec<MetricDescriptor>> = LazyLock::new(|| {
    SMART_FIELDS
        .iter()
        .map(|field| MetricDescriptor::new(field.metric, field.help, field.metric_type, &DEVICE_LABELS))
        .collect()
});

pub fn smart_descriptors() -> &'static [MetricDescriptor] {
    &SMART_DESCRIPTORS
}

/// The 22 points read from one device, plus the keys whose values were not numeric.
#[derive(Debug, Clone)]
pub struct Translation {
    pub points: Vec<MetricPoint>,
    pub fallbacks: Vec<&'static str>,
}

pub async fn translate(runner: &dyn CommandRunner, device: &DeviceDescriptor) -> Result<Translation> {
    let stdout = runner
        .run(&["smart-log", device.path.as_str(), "-o", "json"])
        .await?;
    translate_record(device, &stdout)
}

pub fn translate_record(device: &DeviceDescriptor, stdout: &[u8]) -> Result<Translation> {
    let record: Map<String, Value> =
        serde_json::from_slice(stdout).map_err(|err| NvmexError::Parse {
            context: format!("nvme smart-log {}", device.path),
            reason: err.to_string(),
        })?;

    let labels = [device.path.as_str(), device.model.as_str()];
    let mut points = Vec::with_capacity(SMART_FIELDS.len());
    let mut fallbacks = Vec::new();

    for (field, descriptor) in SMART_FIELDS.iter().zip(smart_descriptors()) {
        let raw = record.get(field.key).ok_or_else(|| NvmexError::MissingField {
            field: field.key.to_string(),
            device: device.path.clone(),
        })?;

        let value = match to_numeric(raw) {
            Some(value) => value,
            None => {
                warn!(
                    device = %device.path,
                    field = field.key,
                    raw = %raw,
                    "non-numeric smart-log value, exporting 0"
                );
                fallbacks.push(field.key);
                0.0
            }
        };

        points.push(MetricPoint {
            descriptor,
            sample: descriptor.sample(&labels, field.unit.apply(value)),
        });
    }

    Ok(Translation { points, fallbacks })
}
