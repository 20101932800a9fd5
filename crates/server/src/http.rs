//! HTTP surface
//!
//! One feedback endpoint plus a health check, behind a permissive CORS
//! layer. The layer wraps every response, so error paths carry the
//! cross-origin headers too.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::feedback::feedback;
use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/feedback",
            post(feedback)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Permissive cross-origin policy: any origin, credentials enabled.
///
/// Credentialed requests cannot use the `*` wildcard, so the origin is
/// mirrored back instead.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// Bare (non-preflight) OPTIONS short-circuits with no body
async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any method other than POST/OPTIONS
async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, HeaderValue::from_static("POST"))],
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
