//! Scrape-time collector — walks the Instant On inventory and flattens it
//! into samples.
//!
//! ```text
//! /sites
//!   ├── /sites/{id}/clientSummary   → client_*
//!   └── /sites/{id}/inventory       → device_*
//!         ├── ethernetPorts         → ethernet_*
//!         └── radios                → radio_*
//! ```
//!
//! Every entity type has one label builder, so all samples sharing a name
//! share label names in the same order.

use std::time::Instant;

use ion_api::model::from_element;
use ion_api::{ClientSummary, Device, ElementSource, EthernetPort, Radio, Site};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::MetricsResult;
use crate::family::{MetricFamily, group_samples};
use crate::sample::{Labels, Sample};

pub struct Collector<S> {
    source: S,
}

impl<S: ElementSource> Collector<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch everything and return one family per metric name.
    pub async fn collect(&mut self) -> MetricsResult<Vec<MetricFamily>> {
        info!("starting collection");
        let started = Instant::now();

        let samples = self.samples().await?;
        let sample_count = samples.len();
        let families = group_samples(samples)?;

        info!(
            families = families.len(),
            samples = sample_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "finished collection"
        );
        Ok(families)
    }

    /// The flat, ungrouped sample list, in walk order.
    pub async fn samples(&mut self) -> MetricsResult<Vec<Sample>> {
        let mut samples = Vec::new();

        let sites: Vec<Site> = self.fetch("/sites").await?;
        for site in &sites {
            let labels = site_labels(site);
            samples.push(Sample::info(
                "site_meta",
                labels.clone().with("site_name", &site.name),
            ));

            let clients: Vec<ClientSummary> =
                self.fetch(&site_path(site, "clientSummary")).await?;
            for client in &clients {
                samples.extend(client_samples(&labels, client));
            }

            let devices: Vec<Device> = self.fetch(&site_path(site, "inventory")).await?;
            for device in &devices {
                samples.extend(device_samples(&labels, device));
            }

            debug!(
                site_id = %site.id,
                clients = clients.len(),
                devices = devices.len(),
                "site walked"
            );
        }

        Ok(samples)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&mut self, path: &str) -> MetricsResult<Vec<T>> {
        let elements: Vec<Value> = self.source.elements(path).await?;
        let decoded = elements
            .into_iter()
            .map(|element| from_element(path, element))
            .collect::<Result<Vec<T>, _>>()?;
        Ok(decoded)
    }
}

// ── Label builders ─────────────────────────────────────────────

/// `/sites/{id}/{collection}`, with the id encoded as a single path segment.
fn site_path(site: &Site, collection: &str) -> String {
    format!("/sites/{}/{collection}", urlencoding::encode(&site.id))
}

fn site_labels(site: &Site) -> Labels {
    Labels::new().with("site_id", &site.id)
}

fn client_labels(site: &Labels, client: &ClientSummary) -> Labels {
    site.clone()
        .with("client_id", &client.id)
        .with("radio_id", &client.radio_id)
}

fn device_labels(site: &Labels, device: &Device) -> Labels {
    site.clone().with("device_id", &device.id)
}

fn port_labels(device: &Labels, port: &EthernetPort) -> Labels {
    device.clone().with("port_id", &port.port_number)
}

fn radio_labels(device: &Labels, radio: &Radio) -> Labels {
    device.clone().with("radio_id", &radio.id)
}

// ── Per-entity samples ─────────────────────────────────────────

fn measurements(labels: &Labels, fields: &[(&'static str, Option<f64>)]) -> Vec<Sample> {
    fields
        .iter()
        .map(|(name, value)| Sample::new(*name, *value, labels.clone()))
        .collect()
}

fn client_samples(site: &Labels, client: &ClientSummary) -> Vec<Sample> {
    let labels = client_labels(site, client);
    let mut samples = vec![Sample::info(
        "client_meta",
        labels
            .clone()
            .with("client_name", &client.name)
            .with("client_ip", &client.ip_address)
            .with("client_protocol", &client.wireless_protocol)
            .with("client_security", &client.wireless_security),
    )];
    samples.extend(measurements(
        &labels,
        &[
            (
                "client_connection_duration_seconds_total",
                client.connection_duration_in_seconds,
            ),
            (
                "client_downstream_data_transferred_bytes_24h",
                client.downstream_data_transferred_in_bytes,
            ),
            ("client_downstream_retry_percent", client.downstream_retry_percent),
            (
                "client_downstream_speed_mbps",
                client.downstream_speed_in_megabits_per_second,
            ),
            (
                "client_downstream_throughput_bps",
                client.downstream_throughput_in_bits_per_second,
            ),
            ("client_health_percent", client.health_in_percent),
            ("client_noise_dbm", client.noise_in_dbm),
            ("client_signal_dbm", client.signal_in_dbm),
            ("client_snr_db", client.snr_in_db),
            (
                "client_upstream_data_transferred_bytes_24h",
                client.upstream_data_transferred_in_bytes,
            ),
            ("client_upstream_retry_percent", client.upstream_retry_percent),
            (
                "client_upstream_speed_mbps",
                client.upstream_speed_in_megabits_per_second,
            ),
            (
                "client_upstream_throughput_bps",
                client.upstream_throughput_in_bits_per_second,
            ),
        ],
    ));
    samples
}

fn device_samples(site: &Labels, device: &Device) -> Vec<Sample> {
    let labels = device_labels(site, device);
    let mut samples = vec![
        Sample::info(
            "device_meta",
            labels
                .clone()
                .with("device_name", &device.name)
                .with("device_model", &device.model)
                .with("device_version", &device.current_firmware_version),
        ),
        Sample::new(
            "device_uptime_seconds_total",
            device.uptime_in_seconds,
            labels.clone(),
        ),
    ];

    for port in device.ethernet_ports() {
        samples.extend(measurements(
            &port_labels(&labels, port),
            &[
                (
                    "ethernet_downstream_data_transferred_bytes_total",
                    port.downstream_data_transferred_in_bytes,
                ),
                (
                    "ethernet_downstream_throughput_bps",
                    port.downstream_throughput_in_bits_per_second,
                ),
                (
                    "ethernet_upstream_data_transferred_bytes_total",
                    port.upstream_data_transferred_in_bytes,
                ),
                (
                    "ethernet_upstream_throughput_bps",
                    port.upstream_throughput_in_bits_per_second,
                ),
            ],
        ));
    }

    for radio in device.radios() {
        let labels = radio_labels(&labels, radio);
        samples.push(Sample::info(
            "radio_meta",
            labels.clone().with("radio_band", &radio.band),
        ));
        samples.extend(measurements(
            &labels,
            &[
                (
                    "radio_regulatory_max_tx_power_eirp_dbm",
                    radio.regulatory_max_tx_power_eirp_in_dbm,
                ),
                ("radio_tx_power_eirp_dbm", radio.tx_power_eirp_in_dbm),
                ("radio_utilization_percent", radio.utilization_percent),
                ("radio_wireless_clients_count", radio.wireless_clients_count),
            ],
        ));
    }

    samples
}
