use std::collections::HashMap;

use crate::types::{MetricDescriptor, MetricFamily, MetricPoint, MetricSample};

/// Groups samples into families, keeping the order in which each metric was first seen.
#[derive(Debug, Default)]
pub struct MetricSet {
    families: Vec<MetricFamily>,
    index: HashMap<String, usize>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a family without samples so it keeps its position in the output.
    pub fn declare(&mut self, descriptor: &MetricDescriptor) {
        self.family_mut(descriptor);
    }

    pub fn push(&mut self, descriptor: &MetricDescriptor, sample: MetricSample) {
        self.family_mut(descriptor).samples.push(sample);
    }

    pub fn push_point(&mut self, point: MetricPoint) {
        self.push(point.descriptor, point.sample);
    }

    pub fn extend_points(&mut self, points: impl IntoIterator<Item = MetricPoint>) {
        for point in points {
            self.push_point(point);
        }
    }

    pub fn family(&self, name: &str) -> Option<&MetricFamily> {
        self.index.get(name).map(|position| &self.families[*position])
    }

    pub fn families(&self) -> &[MetricFamily] {
        &self.families
    }

    pub fn sample_count(&self) -> usize {
        self.families.iter().map(|family| family.samples.len()).sum()
    }

    pub fn into_families(self) -> Vec<MetricFamily> {
        self.families
    }

    fn family_mut(&mut self, descriptor: &MetricDescriptor) -> &mut MetricFamily {
        let position = match self.index.get(&descriptor.name) {
            Some(position) => *position,
            None => {
                self.families.push(MetricFamily {
                    descriptor: descriptor.clone(),
                    samples: Vec::new(),
                });
                let position = self.families.len() - 1;
                self.index.insert(descriptor.name.clone(), position);
                position
            }
        };

        &mut self.families[position]
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{MetricDescriptor, MetricType};

    use super::MetricSet;

    #[test]
    fn groups_samples_in_first_seen_order() {
        let temperature =
            MetricDescriptor::new("temperature", "Temperature", MetricType::Gauge, &["device"]);
        let cycles =
            MetricDescriptor::new("power_cycles", "Power cycles", MetricType::Counter, &["device"]);

        let mut set = MetricSet::new();
        set.push(&temperature, temperature.sample(&["/dev/nvme0"], 98.0));
        set.push(&cycles, cycles.sample(&["/dev/nvme0"], 12.0));
        set.push(&temperature, temperature.sample(&["/dev/nvme1"], 101.0));

        let names: Vec<&str> = set
            .families()
            .iter()
            .map(|family| family.descriptor.name.as_str())
            .collect();
        assert_eq!(names, vec!["temperature", "power_cycles"]);
        assert_eq!(set.family("temperature").map(|f| f.samples.len()), Some(2));
        assert_eq!(set.sample_count(), 3);
    }

    #[test]
    fn declared_family_starts_empty() {
        let devices = MetricDescriptor::new("devices", "Devices", MetricType::Gauge, &[]);
        let mut set = MetricSet::new();
        set.declare(&devices);

        assert_eq!(set.families().len(), 1);
        assert_eq!(set.sample_count(), 0);
    }
}
