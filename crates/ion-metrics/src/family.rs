//! Grouping of samples into metric families.

use std::collections::HashMap;

use crate::error::{MetricsError, MetricsResult};
use crate::sample::{COUNTER_SUFFIX, Labels, MetricKind, Sample};

/// All exported samples sharing one metric name.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    name: &'static str,
    kind: MetricKind,
    label_names: Vec<&'static str>,
    samples: Vec<(Labels, f64)>,
}

impl MetricFamily {
    fn new(name: &'static str, label_names: Vec<&'static str>) -> Self {
        Self {
            name,
            kind: MetricKind::for_name(name),
            label_names,
            samples: Vec::new(),
        }
    }

    /// Full sample name, e.g. `device_uptime_seconds_total`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name used in `# HELP` / `# TYPE` lines: counters drop the `_total`
    /// suffix, which their samples carry.
    pub fn family_name(&self) -> &'static str {
        match self.kind {
            MetricKind::Counter => self.name.strip_suffix(COUNTER_SUFFIX).unwrap_or(self.name),
            MetricKind::Gauge => self.name,
        }
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn label_names(&self) -> &[&'static str] {
        &self.label_names
    }

    pub fn samples(&self) -> &[(Labels, f64)] {
        &self.samples
    }
}

/// Group samples by name, in order of first appearance.
///
/// A family takes its label names from the first sample bearing its name;
/// a later sample with different label names is an error. Samples without
/// an exported value are dropped, but their family is still emitted.
pub fn group_samples(samples: Vec<Sample>) -> MetricsResult<Vec<MetricFamily>> {
    let mut families: Vec<MetricFamily> = Vec::new();
    let mut index: HashMap<&'static str, usize> = HashMap::new();

    for sample in samples {
        let slot = *index.entry(sample.name).or_insert_with(|| {
            families.push(MetricFamily::new(sample.name, sample.labels.names()));
            families.len() - 1
        });
        let family = &mut families[slot];

        let found = sample.labels.names();
        if found != family.label_names {
            return Err(MetricsError::LabelMismatch {
                name: sample.name.to_string(),
                expected: family.label_names.clone(),
                found,
            });
        }

        if let Some(value) = sample.exported_value() {
            family.samples.push((sample.labels, value));
        }
    }

    Ok(families)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: &str) -> Labels {
        Labels::new().with("site_id", id)
    }

    #[test]
    fn groups_in_first_seen_order() {
        let families = group_samples(vec![
            Sample::new("b_metric", Some(1.0), site("s1")),
            Sample::new("a_metric_total", Some(2.0), site("s1")),
            Sample::new("b_metric", Some(3.0), site("s2")),
        ])
        .unwrap();

        let names: Vec<_> = families.iter().map(MetricFamily::name).collect();
        assert_eq!(names, vec!["b_metric", "a_metric_total"]);
        assert_eq!(families[0].samples().len(), 2);
        assert_eq!(families[0].kind(), MetricKind::Gauge);
        assert_eq!(families[1].kind(), MetricKind::Counter);
        assert_eq!(families[1].family_name(), "a_metric");
    }

    #[test]
    fn falsy_values_are_dropped_but_family_remains() {
        let families = group_samples(vec![
            Sample::new("m", Some(0.0), site("s1")),
            Sample::new("m", None, site("s2")),
        ])
        .unwrap();
        assert_eq!(families.len(), 1);
        assert!(families[0].samples().is_empty());
        assert_eq!(families[0].label_names(), &["site_id"]);
    }

    #[test]
    fn label_name_change_is_rejected() {
        let err = group_samples(vec![
            Sample::new("m", Some(1.0), site("s1")),
            Sample::new("m", Some(1.0), site("s1").with("device_id", "d1")),
        ])
        .unwrap_err();
        assert!(matches!(err, MetricsError::LabelMismatch { ref name, .. } if name == "m"));
    }

    #[test]
    fn label_order_change_is_rejected() {
        let err = group_samples(vec![
            Sample::new("m", Some(1.0), Labels::new().with("a", "1").with("b", "2")),
            Sample::new("m", Some(1.0), Labels::new().with("b", "2").with("a", "1")),
        ]);
        assert!(err.is_err());
    }
}
