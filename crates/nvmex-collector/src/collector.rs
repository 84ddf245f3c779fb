use std::{
    sync::{Arc, LazyLock},
    time::{Duration, Instant},
};

use futures::{StreamExt, stream};
use nvmex_common::error::{NvmexError, Result};
use nvmex_metrics::{MetricDescriptor, MetricSet, MetricType};
use tracing::{debug, info, warn};

use crate::{
    device::{DeviceDescriptor, enumerate},
    runner::CommandRunner,
    smart_log::{Translation, smart_descriptors, translate},
};

/// What a collection pass does when one device's health log cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceErrorPolicy {
    /// Log the failure, leave the device out, keep going.
    #[default]
    Skip,
    /// Fail the whole pass.
    Abort,
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub max_concurrency: usize,
    pub on_device_error: DeviceErrorPolicy,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 1,
            on_device_error: DeviceErrorPolicy::Skip,
        }
    }
}

struct ExporterDescriptors {
    devices: MetricDescriptor,
    device_errors: MetricDescriptor,
    value_fallbacks: MetricDescriptor,
    scrape_duration_seconds: MetricDescriptor,
}

static EXPORTER_DESCRIPTORS: LazyLock<ExporterDescriptors> = LazyLock::new(|| ExporterDescriptors {
    devices: MetricDescriptor::new(
        "nvme_exporter_devices",
        "Number of NVMe devices enumerated during the scrape",
        MetricType::Gauge,
        &[],
    ),
    device_errors: MetricDescriptor::new(
        "nvme_exporter_device_errors",
        "Number of devices whose smart-log could not be read during the scrape",
        MetricType::Gauge,
        &[],
    ),
    value_fallbacks: MetricDescriptor::new(
        "nvme_exporter_value_fallbacks",
        "Number of non-numeric smart-log values exported as 0 during the scrape",
        MetricType::Gauge,
        &[],
    ),
    scrape_duration_seconds: MetricDescriptor::new(
        "nvme_exporter_scrape_duration_seconds",
        "Time spent collecting smart-log data in seconds",
        MetricType::Gauge,
        &[],
    ),
});

/// Result of one collection pass.
#[derive(Debug)]
pub struct CollectionReport {
    pub metrics: MetricSet,
    pub devices: usize,
    pub device_errors: usize,
    pub value_fallbacks: usize,
    pub duration: Duration,
}

/// Runs enumeration and translation for every scrape. Holds no per-scrape state.
#[derive(Clone)]
pub struct Collector {
    runner: Arc<dyn CommandRunner>,
    config: CollectorConfig,
}

impl Collector {
    pub fn new(runner: Arc<dyn CommandRunner>, config: CollectorConfig) -> Self {
        Self { runner, config }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub async fn collect(&self) -> Result<CollectionReport> {
        let started_at = Instant::now();
        let devices = enumerate(self.runner.as_ref()).await?;
        let device_count = devices.len();

        let mut metrics = MetricSet::new();
        for descriptor in smart_descriptors() {
            metrics.declare(descriptor);
        }

        let mut device_errors = 0_usize;
        let mut value_fallbacks = 0_usize;

        let mut translations = stream::iter(devices)
            .map(|device| {
                let runner = Arc::clone(&self.runner);
                async move {
                    let result = translate(runner.as_ref(), &device).await;
                    (device, result)
                }
            })
            .buffered(self.config.max_concurrency.max(1));

        while let Some((device, result)) = translations.next().await {
            match result {
                Ok(Translation { points, fallbacks }) => {
                    debug!(device = %device.path, samples = points.len(), "translated smart-log");
                    value_fallbacks += fallbacks.len();
                    metrics.extend_points(points);
                }
                Err(err) => {
                    if self.config.on_device_error == DeviceErrorPolicy::Abort {
                        return Err(err);
                    }
                    warn_skipped(&device, &err);
                    device_errors += 1;
                }
            }
        }

        let duration = started_at.elapsed();
        let exporter = &*EXPORTER_DESCRIPTORS;
        metrics.push(&exporter.devices, exporter.devices.sample(&[], device_count as f64));
        metrics.push(
            &exporter.device_errors,
            exporter.device_errors.sample(&[], device_errors as f64),
        );
        metrics.push(
            &exporter.value_fallbacks,
            exporter.value_fallbacks.sample(&[], value_fallbacks as f64),
        );
        metrics.push(
            &exporter.scrape_duration_seconds,
            exporter
                .scrape_duration_seconds
                .sample(&[], duration.as_secs_f64()),
        );

        info!(
            devices = device_count,
            device_errors,
            value_fallbacks,
            elapsed_ms = duration.as_millis() as u64,
            "collected nvme smart-log metrics"
        );

        Ok(CollectionReport {
            metrics,
            devices: device_count,
            device_errors,
            value_fallbacks,
            duration,
        })
    }
}

fn warn_skipped(device: &DeviceDescriptor, err: &NvmexError) {
    warn!(
        device = %device.path,
        model = %device.model,
        class = err.class(),
        error = %err,
        "skipping device"
    );
}
