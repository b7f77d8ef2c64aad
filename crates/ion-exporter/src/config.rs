//! Exporter configuration: command line / environment, plus an optional
//! TOML file for upstream endpoint overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use ion_api::ApiConfig;
use ion_sso::{SsoConfig, SsoSettings};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "ion-exporter", about = "Prometheus exporter for Aruba Instant On")]
pub struct Cli {
    /// Instant On username.
    #[arg(long, env = "ION_USERNAME")]
    pub ion_username: String,

    /// Instant On password.
    #[arg(long, env = "ION_PASSWORD", hide_env_values = true)]
    pub ion_password: String,

    /// Instant On one-time password.
    #[arg(long, env = "ION_OTP", hide_env_values = true)]
    pub ion_otp: Option<String>,

    /// Log level (`RUST_LOG` takes precedence).
    #[arg(long, env = "LOG_LEVEL", value_enum, ignore_case = true, default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Address on which to listen; empty means all interfaces.
    #[arg(long, env = "HOST", default_value = "")]
    pub host: String,

    /// Port on which to listen.
    #[arg(long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Optional TOML file with upstream endpoint overrides.
    #[arg(long, env = "ION_EXPORTER_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn listen_host(&self) -> &str {
        if self.host.is_empty() {
            "0.0.0.0"
        } else {
            &self.host
        }
    }
}

/// Verbosity of the exporter's own logs. Accepts the `logging` level
/// names operators already use (`warning`, `critical`, `fatal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[value(alias = "warning")]
    Warn,
    #[value(alias = "critical", alias = "fatal")]
    Error,
    Off,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Upstream endpoints and client tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    pub api_base_url: String,
    pub api_version: u32,
    pub sso_base_url: String,
    pub settings_url: String,
    pub request_timeout_secs: u64,
    /// Fixed SSO settings; fetched from `settings_url` when absent.
    pub sso: Option<SsoSettings>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: ion_api::session::DEFAULT_BASE_URL.to_string(),
            api_version: ion_api::session::DEFAULT_API_VERSION,
            sso_base_url: ion_sso::client::DEFAULT_BASE_URL.to_string(),
            settings_url: ion_sso::client::DEFAULT_SETTINGS_URL.to_string(),
            request_timeout_secs: 30,
            sso: None,
        }
    }
}

impl UpstreamConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: UpstreamConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_base_url.clone(),
            api_version: self.api_version,
            timeout: self.timeout(),
        }
    }

    pub fn sso_config(&self) -> SsoConfig {
        SsoConfig {
            base_url: self.sso_base_url.clone(),
            settings_url: self.settings_url.clone(),
            settings: self.sso.clone(),
            timeout: self.timeout(),
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
