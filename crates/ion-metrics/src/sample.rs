//! Metric samples and their label sets.

/// Metric names ending in this suffix are cumulative and exported as
/// counters.
pub const COUNTER_SUFFIX: &str = "_total";

/// Prometheus metric type of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    /// Classify a metric by its name.
    pub fn for_name(name: &str) -> Self {
        if name.ends_with(COUNTER_SUFFIX) {
            MetricKind::Counter
        } else {
            MetricKind::Gauge
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Ordered label set. Insertion order is exposition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels(Vec<(&'static str, String)>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label, returning the extended set.
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.push((name, value.into()));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|(name, _)| *name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(n, v)| (*n, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One measurement before grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: &'static str,
    pub value: Option<f64>,
    pub labels: Labels,
}

impl Sample {
    pub fn new(name: &'static str, value: Option<f64>, labels: Labels) -> Self {
        Self {
            name,
            value,
            labels,
        }
    }

    /// Constant-1 sample whose labels carry descriptive metadata.
    pub fn info(name: &'static str, labels: Labels) -> Self {
        Self::new(name, Some(1.0), labels)
    }

    /// The value to export, if any.
    ///
    /// Absent and zero values are both treated as missing, so a genuine
    /// zero reading is never exported.
    pub fn exported_value(&self) -> Option<f64> {
        self.value.filter(|v| *v != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_suffix() {
        assert_eq!(
            MetricKind::for_name("device_uptime_seconds_total"),
            MetricKind::Counter
        );
        assert_eq!(
            MetricKind::for_name("client_downstream_data_transferred_bytes_24h"),
            MetricKind::Gauge
        );
        assert_eq!(MetricKind::for_name("total_clients"), MetricKind::Gauge);
    }

    #[test]
    fn labels_keep_insertion_order() {
        let labels = Labels::new()
            .with("site_id", "s1")
            .with("client_id", "c1")
            .with("radio_id", "r1");
        assert_eq!(labels.names(), vec!["site_id", "client_id", "radio_id"]);
        assert_eq!(labels.get("client_id"), Some("c1"));
        assert_eq!(labels.get("port_id"), None);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn zero_and_absent_are_not_exported() {
        let labels = Labels::new();
        assert_eq!(Sample::new("x", None, labels.clone()).exported_value(), None);
        assert_eq!(Sample::new("x", Some(0.0), labels.clone()).exported_value(), None);
        assert_eq!(Sample::new("x", Some(-0.0), labels.clone()).exported_value(), None);
        assert_eq!(Sample::new("x", Some(-71.0), labels.clone()).exported_value(), Some(-71.0));
        assert_eq!(Sample::info("x", labels).exported_value(), Some(1.0));
    }
}
