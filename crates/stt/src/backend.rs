//! Whisper-style transcription backend
//!
//! Uploads the recording as multipart form data and requests `verbose_json`
//! with word granularity so the analyzer gets per-word timing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use speakscore_core::{SpeechToText, TranscriptResult, WordTimestamp};

use crate::SttError;

/// Transcription backend configuration
#[derive(Debug, Clone)]
pub struct SttConfig {
    /// API base URL, e.g. `https://api.openai.com/v1`
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// API key; `None` surfaces as a missing-credential error at dispatch
    pub api_key: Option<String>,
    /// Name of the environment variable the key is expected in, for diagnostics
    pub api_key_env: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "whisper-1".to_string(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// OpenAI-compatible transcription client
#[derive(Clone)]
pub struct WhisperStt {
    client: Client,
    config: SttConfig,
}

impl WhisperStt {
    /// Create a new transcription client
    pub fn new(config: SttConfig) -> Result<Self, SttError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SttError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn api_key(&self) -> Result<&str, SttError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| SttError::MissingApiKey(self.config.api_key_env.clone()))
    }

    async fn execute_request(&self, audio: &[u8], filename: &str) -> Result<VerboseTranscription, SttError> {
        let form = Form::new()
            .part(
                "file",
                Part::bytes(audio.to_vec()).file_name(filename.to_string()),
            )
            .text("model", self.config.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "word");

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(self.api_key()?)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = upstream_message(&response.text().await.unwrap_or_default());
            return Err(SttError::Api { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| SttError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl SpeechToText for WhisperStt {
    async fn transcribe(
        &self,
        audio: &[u8],
        filename: &str,
    ) -> speakscore_core::Result<TranscriptResult> {
        tracing::debug!(
            bytes = audio.len(),
            filename,
            model = %self.config.model,
            "dispatching transcription request"
        );

        let raw = self.execute_request(audio, filename).await?;

        let words = raw
            .words
            .unwrap_or_default()
            .into_iter()
            .map(|w| WordTimestamp::new(w.word, w.start, w.end))
            .collect();

        Ok(TranscriptResult {
            text: raw.text,
            words,
            duration: raw.duration,
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Pull the human-readable message out of an error body, falling back to the
/// raw text when it is not the usual `{"error": {"message": ...}}` shape.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

// Wire types for the verbose_json response
#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    text: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    words: Option<Vec<VerboseWord>>,
}

#[derive(Debug, Deserialize)]
struct VerboseWord {
    word: String,
    start: f64,
    end: f64,
}
