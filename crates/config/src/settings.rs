//! Service settings
//!
//! Layered configuration: defaults, then an optional TOML file, then
//! SPEAKSCORE_-prefixed environment variables (double underscore as the
//! section separator, e.g. SPEAKSCORE_SERVER__PORT=9000).

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Top-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Transcription collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// API base URL (OpenAI-compatible)
    #[serde(default = "default_api_base")]
    pub endpoint: String,
    /// Transcription model
    #[serde(default = "default_stt_model")]
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Request timeout in seconds
    #[serde(default = "default_stt_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_api_base(),
            model: default_stt_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_stt_timeout_secs(),
        }
    }
}

/// Text-generation collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// API base URL (OpenAI-compatible)
    #[serde(default = "default_api_base")]
    pub endpoint: String,
    /// Chat model
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens in the generated feedback
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_api_base(),
            model: default_llm_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_stt_timeout_secs() -> u64 {
    60
}

fn default_llm_timeout_secs() -> u64 {
    60
}

/// Load settings from an optional file plus environment overrides
///
/// The file is not required to exist; defaults cover every field.
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path).required(false));
        tracing::debug!(path, "loading configuration file if present");
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("SPEAKSCORE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<Settings>()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(settings.transcription.model, "whisper-1");
        assert_eq!(settings.generation.api_key_env, "OPENAI_API_KEY");
        assert_eq!(settings.generation.max_tokens, 1500);
    }

    #[test]
    fn test_load_without_file() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("speakscore.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9001

[generation]
model = "llama-3.3-70b-versatile"
"#
        )
        .unwrap();

        let settings = load_settings(path.to_str()).unwrap();
        assert_eq!(settings.server.port, 9001);
        assert_eq!(settings.generation.model, "llama-3.3-70b-versatile");
        // Untouched sections keep their defaults
        assert_eq!(settings.transcription.model, "whisper-1");
    }
}
