//! Chat-completions backend
//!
//! OpenAI-compatible `chat/completions` client. The service consumes the
//! model's output as opaque text; parsing it into the band-score document is
//! `scoring`'s job, so a schema-violating completion is not an error here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use speakscore_core::{
    FinishReason, GenerateRequest, GenerateResponse, LanguageModel, Message, TokenUsage,
};

use crate::LlmError;

/// Generation backend configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API base URL, e.g. `https://api.openai.com/v1`
    pub endpoint: String,
    /// Default model, used when the request carries no override
    pub model: String,
    /// API key; `None` surfaces as a missing-credential error at dispatch
    pub api_key: Option<String>,
    /// Name of the environment variable the key is expected in, for diagnostics
    pub api_key_env: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// OpenAI-compatible chat completions client
#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    config: LlmConfig,
}

impl OpenAiBackend {
    /// Create a new backend
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(self.config.api_key_env.clone()))
    }

    async fn execute_request(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(self.api_key()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = upstream_message(&response.text().await.unwrap_or_default());
            return Err(LlmError::Api { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LanguageModel for OpenAiBackend {
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> speakscore_core::Result<GenerateResponse> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.model.clone());

        tracing::debug!(model = %model, messages = request.messages.len(), "dispatching generation request");

        let wire_request = ChatRequest {
            model,
            messages: request.messages.iter().map(ChatMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let raw = self.execute_request(&wire_request).await?;

        let choice = raw.choices.into_iter().next().ok_or_else(|| {
            LlmError::InvalidResponse("response contained no choices".to_string())
        })?;

        Ok(GenerateResponse {
            text: choice.message.content,
            finish_reason: finish_reason(choice.finish_reason.as_deref()),
            usage: raw
                .usage
                .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens)),
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn finish_reason(raw: Option<&str>) -> FinishReason {
    match raw {
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        Some("stop") | None => FinishReason::Stop,
        Some(_) => FinishReason::Error,
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

// Wire types for the chat completions API
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl From<&Message> for ChatMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: match msg.role {
                speakscore_core::Role::System => "system",
                speakscore_core::Role::User => "user",
                speakscore_core::Role::Assistant => "assistant",
            }
            .to_string(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
