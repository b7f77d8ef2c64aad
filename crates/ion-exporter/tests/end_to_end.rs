//! Full stack against a fake Instant On backend: SSO login, API session,
//! collector and scrape endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use ion_api::{ApiConfig, ApiSession, Credentials};
use ion_exporter::build_router;
use ion_metrics::Collector;
use ion_sso::{SsoClient, SsoConfig};
use serde_json::json;
use tower::ServiceExt;

#[derive(Default)]
struct Backend {
    logins: AtomicUsize,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) == Some("Bearer access-1")
}

async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::default());
    let router = Router::new()
        .route(
            "/aio/api/v1/mfa/validate/full",
            post(|| async { Json(json!({ "access_token": "session-1" })) }),
        )
        .route(
            "/as/authorize",
            get(|| async {
                (
                    StatusCode::FOUND,
                    [(header::LOCATION, "https://portal.example/cb?code=abc")],
                )
            }),
        )
        .route(
            "/as/token",
            post(|State(b): State<Arc<Backend>>| async move {
                b.logins.fetch_add(1, Ordering::SeqCst);
                Json(json!({ "access_token": "access-1", "refresh_token": "refresh-1" }))
            }),
        )
        .route(
            "/settings.json",
            get(|| async {
                Json(json!({
                    "ssoClientIdAuthZ": "ion-client",
                    "ssoRedirectUrl": "https://portal.example/cb",
                    "ssoEndpointAuthZ": "/authorize",
                    "ssoEndpointTokens": "/token"
                }))
            }),
        )
        .route(
            "/api/sites",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!({ "elements": [{ "id": "s1", "name": "Cabin" }] })).into_response()
            }),
        )
        .route(
            "/api/sites/{id}/{collection}",
            get(|Path((id, collection)): Path<(String, String)>, headers: HeaderMap| async move {
                if !authorized(&headers) || id != "s1" {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                let elements = match collection.as_str() {
                    "clientSummary" => json!([{ "id": "c1", "radioId": "r1", "signalInDbm": -58 }]),
                    "inventory" => json!([{
                        "id": "d1",
                        "ethernetPorts": [],
                        "radios": [{ "id": "r1", "band": "5GHz", "utilizationPercent": 7 }]
                    }]),
                    _ => return StatusCode::NOT_FOUND.into_response(),
                };
                Json(json!({ "elements": elements })).into_response()
            }),
        )
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), backend)
}

#[tokio::test]
async fn scrape_logs_in_once_and_exports_telemetry() {
    let (base, backend) = spawn_backend().await;

    let sso = SsoClient::new(SsoConfig {
        base_url: base.clone(),
        settings_url: format!("{base}/settings.json"),
        settings: None,
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    let api = ApiConfig {
        base_url: format!("{base}/api"),
        ..ApiConfig::default()
    };
    let credentials = Credentials {
        username: "alice".to_string(),
        password: "secret".to_string(),
        otp: None,
    };
    let session = ApiSession::new(api, sso, credentials).unwrap();
    let router = build_router(Collector::new(session));

    for _ in 0..2 {
        let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("client_signal_dbm{site_id=\"s1\",client_id=\"c1\",radio_id=\"r1\"} -58\n"));
        assert!(body.contains(
            "radio_utilization_percent{site_id=\"s1\",device_id=\"d1\",radio_id=\"r1\"} 7\n"
        ));
        assert!(body.contains("site_meta{site_id=\"s1\",site_name=\"Cabin\"} 1\n"));
    }

    // Tokens persist across scrapes.
    assert_eq!(backend.logins.load(Ordering::SeqCst), 1);
}
