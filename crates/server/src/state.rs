//! Shared application state
//!
//! Collaborator handles are constructed once at process start and shared
//! read-only by every request; there is no per-request client setup and no
//! teardown beyond process exit.

use std::sync::Arc;
use std::time::Duration;

use speakscore_config::{AssessmentPrompt, Settings};
use speakscore_core::{LanguageModel, SpeechToText};
use speakscore_llm::{LlmConfig, OpenAiBackend};
use speakscore_stt::{SttConfig, WhisperStt};

/// Application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub rubric: Arc<AssessmentPrompt>,
    pub stt: Arc<dyn SpeechToText>,
    pub llm: Arc<dyn LanguageModel>,
}

impl AppState {
    /// Build the production state with HTTP-backed collaborators.
    ///
    /// API keys are resolved from the environment here; a key that is absent
    /// does not fail startup, it surfaces as a missing-credential error on
    /// the first request that needs it.
    pub fn new(settings: Settings) -> speakscore_core::Result<Self> {
        let stt = WhisperStt::new(SttConfig {
            endpoint: settings.transcription.endpoint.clone(),
            model: settings.transcription.model.clone(),
            api_key: std::env::var(&settings.transcription.api_key_env).ok(),
            api_key_env: settings.transcription.api_key_env.clone(),
            timeout: Duration::from_secs(settings.transcription.timeout_secs),
        })
        .map_err(speakscore_core::Error::from)?;

        let llm = OpenAiBackend::new(LlmConfig {
            endpoint: settings.generation.endpoint.clone(),
            model: settings.generation.model.clone(),
            api_key: std::env::var(&settings.generation.api_key_env).ok(),
            api_key_env: settings.generation.api_key_env.clone(),
            timeout: Duration::from_secs(settings.generation.timeout_secs),
        })
        .map_err(speakscore_core::Error::from)?;

        Ok(Self::with_backends(settings, Arc::new(stt), Arc::new(llm)))
    }

    /// Build state around explicit collaborator implementations (tests)
    pub fn with_backends(
        settings: Settings,
        stt: Arc<dyn SpeechToText>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            rubric: Arc::new(AssessmentPrompt::default()),
            stt,
            llm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_creation() {
        let state = AppState::new(Settings::default()).unwrap();
        assert_eq!(state.stt.model_name(), "whisper-1");
        assert_eq!(state.llm.model_name(), "gpt-4o-mini");
    }
}
