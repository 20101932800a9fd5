//! Transcription collaborator integration
//!
//! Consumes an OpenAI-compatible `audio/transcriptions` endpoint as a black
//! box: raw audio bytes in, text plus word-level timing out. Nothing in this
//! crate interprets the audio itself.

pub mod backend;

pub use backend::{SttConfig, WhisperStt};

use thiserror::Error;

/// Transcription errors
#[derive(Error, Debug)]
pub enum SttError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("missing API key: {0}")]
    MissingApiKey(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for SttError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SttError::Timeout
        } else {
            SttError::Network(err.to_string())
        }
    }
}

impl From<SttError> for speakscore_core::Error {
    fn from(err: SttError) -> Self {
        match err {
            SttError::Api { status, message } => speakscore_core::Error::Transcription {
                status: Some(status),
                message,
            },
            SttError::MissingApiKey(env) => speakscore_core::Error::MissingCredential(env),
            SttError::Configuration(message) => speakscore_core::Error::Config(message),
            other => speakscore_core::Error::Transcription {
                status: None,
                message: other.to_string(),
            },
        }
    }
}
