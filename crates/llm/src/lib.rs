//! Generation collaborator integration
//!
//! Three concerns live here:
//! - `backend` - the chat-completions client consumed as a black box
//! - `prompt` - assembly of the examiner prompt (question, part, delivery
//!   metrics block, transcript)
//! - `scoring` - normalizing the model's output text into the band-score
//!   document, with a fixed fallback when it does not parse

pub mod backend;
pub mod prompt;
pub mod scoring;

pub use backend::{LlmConfig, OpenAiBackend};
pub use prompt::PromptBuilder;
pub use scoring::{fallback_document, normalize_feedback};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
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

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for speakscore_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, message } => speakscore_core::Error::Generation {
                status: Some(status),
                message,
            },
            LlmError::MissingApiKey(env) => speakscore_core::Error::MissingCredential(env),
            LlmError::Configuration(message) => speakscore_core::Error::Config(message),
            other => speakscore_core::Error::Generation {
                status: None,
                message: other.to_string(),
            },
        }
    }
}
