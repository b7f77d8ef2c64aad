//! ion-metrics — Instant On telemetry as Prometheus metrics.
//!
//! Walks sites, clients, devices, ports and radios through an
//! [`ElementSource`](ion_api::ElementSource), flattens them into labeled
//! samples, groups the samples into families and renders the Prometheus
//! text exposition.
//!
//! # Architecture
//!
//! ```text
//! Collector<S: ElementSource>
//!   ├── samples()  → Vec<Sample>        (one walk, all fetches serial)
//!   └── collect()  → Vec<MetricFamily>  (grouped by name, falsy values dropped)
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```

pub mod collector;
pub mod error;
pub mod family;
pub mod prometheus;
pub mod sample;

pub use collector::Collector;
pub use error::{MetricsError, MetricsResult};
pub use family::{MetricFamily, group_samples};
pub use prometheus::{CONTENT_TYPE, render_prometheus};
pub use sample::{Labels, MetricKind, Sample};
