//! Speaking feedback server
//!
//! Single-endpoint HTTP surface: `POST /api/feedback` accepts either a
//! multipart audio submission or a JSON transcript, orchestrates the
//! transcription and generation collaborators, and returns the normalized
//! feedback document.

pub mod feedback;
pub mod http;
pub mod multipart;
pub mod state;

pub use http::create_router;
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use speakscore_core::Error;

/// Errors a request handler can surface to the caller.
///
/// Shape errors from the generation collaborator never appear here: those
/// are absorbed into the fallback document and the request still succeeds.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client input problem, terminates the request with 400
    #[error("{0}")]
    BadRequest(String),

    /// Collaborator or configuration failure, terminates with 500
    #[error(transparent)]
    Upstream(#[from] Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                tracing::warn!(%message, "rejecting request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Upstream(err) => {
                tracing::error!(error = %err, "upstream failure");
                let (label, details, status) = match &err {
                    Error::Transcription { status, message } => {
                        ("Transcription failed", message.clone(), *status)
                    }
                    Error::Generation { status, message } => {
                        ("Feedback generation failed", message.clone(), *status)
                    }
                    Error::MissingCredential(env) => (
                        "Missing API credential",
                        format!("environment variable {env} is not set"),
                        None,
                    ),
                    Error::Config(message) => {
                        ("Server configuration error", message.clone(), None)
                    }
                };

                let mut body = json!({ "error": label, "details": details });
                if let Some(code) = status {
                    body["status"] = json!(code);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
