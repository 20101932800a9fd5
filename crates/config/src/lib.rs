//! Configuration management for the speaking feedback service
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (SPEAKSCORE_ prefix)
//!
//! All settings carry serde defaults so the service starts with no
//! configuration file at all; only the collaborator API key has to come
//! from the environment.

pub mod prompts;
pub mod settings;

pub use prompts::AssessmentPrompt;
pub use settings::{
    load_settings, GenerationConfig, ServerConfig, Settings, TranscriptionConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
