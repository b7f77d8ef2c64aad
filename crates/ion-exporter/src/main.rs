//! ion-exporter — the exporter daemon.
//!
//! # Usage
//!
//! ```text
//! ION_USERNAME=me@example.com ION_PASSWORD=… ion-exporter --port 8000
//! ```

use clap::Parser;
use ion_api::{ApiSession, Credentials};
use ion_exporter::{Cli, LogFormat, LogLevel, UpstreamConfig, build_router};
use ion_metrics::Collector;
use ion_sso::SsoClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level, cli.log_format);

    let upstream = match &cli.config {
        Some(path) => UpstreamConfig::from_file(path)?,
        None => UpstreamConfig::default(),
    };
    info!(
        api = %upstream.api_base_url,
        sso = %upstream.sso_base_url,
        "upstream configured"
    );

    let sso = SsoClient::new(upstream.sso_config())?;
    let credentials = Credentials {
        username: cli.ion_username.clone(),
        password: cli.ion_password.clone(),
        otp: cli.ion_otp.clone(),
    };
    let session = ApiSession::new(upstream.api_config(), sso, credentials)?;
    let router = build_router(Collector::new(session));

    let listener = tokio::net::TcpListener::bind((cli.listen_host(), cli.port)).await?;
    info!(addr = %listener.local_addr()?, "metrics endpoint listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("ion-exporter stopped");
    Ok(())
}

fn init_tracing(level: LogLevel, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.filter().into()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
