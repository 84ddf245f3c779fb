pub mod render;
pub mod set;
pub mod types;

pub use render::render_prometheus;
pub use set::MetricSet;
pub use types::{MetricDescriptor, MetricFamily, MetricPoint, MetricSample, MetricType, MetricValue};
