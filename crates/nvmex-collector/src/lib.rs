pub mod collector;
pub mod device;
pub mod numeric;
pub mod runner;
pub mod smart_log;

#[cfg(test)]
pub(crate) mod fake;

pub use collector::{CollectionReport, Collector, CollectorConfig, DeviceErrorPolicy};
pub use device::{DeviceDescriptor, enumerate};
pub use runner::{CommandRunner, NvmeCli};
pub use smart_log::{SMART_FIELDS, SmartField, Translation, smart_descriptors, translate};
