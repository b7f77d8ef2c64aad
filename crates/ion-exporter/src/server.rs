//! Scrape endpoint.
//!
//! Every request runs a full collection. The collector sits behind an
//! async mutex so concurrent scrapes queue rather than interleave their
//! token refreshes.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use ion_api::ElementSource;
use ion_metrics::{CONTENT_TYPE, Collector, render_prometheus};
use tokio::sync::Mutex;
use tracing::error;

/// Shared state for the scrape handler.
pub struct ScrapeState<S> {
    collector: Arc<Mutex<Collector<S>>>,
}

impl<S> Clone for ScrapeState<S> {
    fn clone(&self) -> Self {
        Self {
            collector: self.collector.clone(),
        }
    }
}

/// Build the exporter router around a collector.
pub fn build_router<S>(collector: Collector<S>) -> Router
where
    S: ElementSource + Send + 'static,
{
    let state = ScrapeState {
        collector: Arc::new(Mutex::new(collector)),
    };

    Router::new()
        .route("/", get(scrape::<S>))
        .route("/metrics", get(scrape::<S>))
        .with_state(state)
}

/// GET /metrics
async fn scrape<S>(State(state): State<ScrapeState<S>>) -> Response
where
    S: ElementSource + Send + 'static,
{
    let mut collector = state.collector.lock().await;
    match collector.collect().await {
        Ok(families) => (
            [(header::CONTENT_TYPE, CONTENT_TYPE)],
            render_prometheus(&families),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "scrape failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("scrape failed: {e}\n"),
            )
                .into_response()
        }
    }
}
