//! ion-exporter — serves Instant On telemetry to Prometheus.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition, collected on demand |
//! | GET | `/` | Same as `/metrics` |

pub mod config;
pub mod server;

pub use config::{Cli, LogFormat, LogLevel, UpstreamConfig};
pub use server::build_router;
