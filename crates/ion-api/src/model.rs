//! Instant On API entities.
//!
//! Only the fields the exporter reads are modelled. Identifier and name
//! fields are lenient: `null` and numbers are accepted and rendered as
//! strings so they can be used directly as label values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// A physical location containing devices and clients.
#[derive(Debug, Clone, Deserialize)]
pub struct Site {
    #[serde(default, deserialize_with = "label")]
    pub id: String,
    #[serde(default, deserialize_with = "label")]
    pub name: String,
}

/// A wireless station, as reported by `/sites/{id}/clientSummary`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    #[serde(default, deserialize_with = "label")]
    pub id: String,
    #[serde(default, deserialize_with = "label")]
    pub name: String,
    #[serde(default, deserialize_with = "label")]
    pub ip_address: String,
    #[serde(default, deserialize_with = "label")]
    pub radio_id: String,
    #[serde(default, deserialize_with = "label")]
    pub wireless_protocol: String,
    #[serde(default, deserialize_with = "label")]
    pub wireless_security: String,

    pub connection_duration_in_seconds: Option<f64>,
    pub downstream_data_transferred_in_bytes: Option<f64>,
    pub downstream_retry_percent: Option<f64>,
    pub downstream_speed_in_megabits_per_second: Option<f64>,
    pub downstream_throughput_in_bits_per_second: Option<f64>,
    pub health_in_percent: Option<f64>,
    pub noise_in_dbm: Option<f64>,
    pub signal_in_dbm: Option<f64>,
    pub snr_in_db: Option<f64>,
    pub upstream_data_transferred_in_bytes: Option<f64>,
    pub upstream_retry_percent: Option<f64>,
    pub upstream_speed_in_megabits_per_second: Option<f64>,
    pub upstream_throughput_in_bits_per_second: Option<f64>,
}

/// A managed switch or access point, as reported by `/sites/{id}/inventory`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, deserialize_with = "label")]
    pub id: String,
    #[serde(default, deserialize_with = "label")]
    pub name: String,
    #[serde(default, deserialize_with = "label")]
    pub model: String,
    #[serde(default, deserialize_with = "label")]
    pub current_firmware_version: String,
    pub uptime_in_seconds: Option<f64>,
    #[serde(default)]
    pub ethernet_ports: Option<Vec<EthernetPort>>,
    #[serde(default)]
    pub radios: Option<Vec<Radio>>,
}

impl Device {
    pub fn ethernet_ports(&self) -> &[EthernetPort] {
        self.ethernet_ports.as_deref().unwrap_or_default()
    }

    pub fn radios(&self) -> &[Radio] {
        self.radios.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthernetPort {
    #[serde(default, deserialize_with = "label")]
    pub port_number: String,
    pub downstream_data_transferred_in_bytes: Option<f64>,
    pub downstream_throughput_in_bits_per_second: Option<f64>,
    pub upstream_data_transferred_in_bytes: Option<f64>,
    pub upstream_throughput_in_bits_per_second: Option<f64>,
}

/// A wireless interface on a device, one per band.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Radio {
    #[serde(default, deserialize_with = "label")]
    pub id: String,
    #[serde(default, deserialize_with = "label")]
    pub band: String,
    pub regulatory_max_tx_power_eirp_in_dbm: Option<f64>,
    pub tx_power_eirp_in_dbm: Option<f64>,
    pub utilization_percent: Option<f64>,
    pub wireless_clients_count: Option<f64>,
}

/// Decode one element of an `elements` array fetched from `path`.
pub fn from_element<T: DeserializeOwned>(path: &str, element: Value) -> ApiResult<T> {
    serde_json::from_value(element).map_err(|e| ApiError::decode(path, e.to_string()))
}

fn label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn client_summary_reads_camel_case_fields() {
        let client: ClientSummary = from_element(
            "/sites/s1/clientSummary",
            json!({
                "id": "c1",
                "name": "laptop",
                "ipAddress": "10.0.0.5",
                "radioId": "r1",
                "wirelessProtocol": "ax",
                "wirelessSecurity": "wpa3",
                "downstreamSpeedInMegabitsPerSecond": 50,
                "signalInDbm": -61.5,
                "noiseInDbm": null
            }),
        )
        .unwrap();
        assert_eq!(client.ip_address, "10.0.0.5");
        assert_eq!(client.downstream_speed_in_megabits_per_second, Some(50.0));
        assert_eq!(client.signal_in_dbm, Some(-61.5));
        assert_eq!(client.noise_in_dbm, None);
        assert_eq!(client.snr_in_db, None);
    }

    #[test]
    fn null_and_numeric_labels_become_strings() {
        let client: ClientSummary =
            from_element("/x", json!({ "id": 42, "radioId": null })).unwrap();
        assert_eq!(client.id, "42");
        assert_eq!(client.radio_id, "");
        assert_eq!(client.name, "");
    }

    #[test]
    fn port_number_is_stringified() {
        let port: EthernetPort = from_element("/x", json!({ "portNumber": 7 })).unwrap();
        assert_eq!(port.port_number, "7");
    }

    #[test]
    fn device_tolerates_missing_or_null_children() {
        let device: Device =
            from_element("/x", json!({ "id": "d1", "radios": null })).unwrap();
        assert!(device.ethernet_ports().is_empty());
        assert!(device.radios().is_empty());
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        let err = from_element::<Site>("/sites", json!("not an object")).unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref path, .. } if path == "/sites"));
    }
}
