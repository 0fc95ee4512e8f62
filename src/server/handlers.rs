//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use crate::error::ScanError;
use crate::scan::{ScanRequest, ScanVerdict};

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/scan", post(scan_payload))
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .layer(TraceLayer::new_for_http())
        // Strict response headers on every route
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ));

    if state.config.cors_enabled {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::POST])
                .allow_headers(Any),
        );
    }

    router.with_state(state)
}

/// Health check response
#[derive(serde::Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Seconds since startup
    pub uptime_secs: u64,
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime().as_secs(),
    })
}

/// Scan endpoint: multipart form with optional `text`, optional `image`
/// file, and a `deep_scan` flag.
async fn scan_payload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut request = ScanRequest::default();

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("text") => request.text = field.text().await.ok(),
            Some("image") => request.image = field.bytes().await.ok(),
            Some("deep_scan") => {
                request.deep_scan = field
                    .text()
                    .await
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false);
            },
            _ => {},
        }
    }

    match state.scanner.scan(request).await {
        Ok(verdict) => (StatusCode::OK, Json(verdict)).into_response(),
        Err(ScanError::InputTooLarge { .. }) => (
            StatusCode::PAYLOAD_TOO_LARGE,
            Json(serde_json::json!({"detail": "Payload too large"})),
        )
            .into_response(),
        // The scanner already fails closed; this arm is the transport
        // layer's own last-resort net for the same guarantee.
        Err(_) => (StatusCode::OK, Json(ScanVerdict::fail_closed())).into_response(),
    }
}
