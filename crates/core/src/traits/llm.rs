//! Language Model trait

use crate::{GenerateRequest, GenerateResponse, Result};
use async_trait::async_trait;

/// Language Model interface
///
/// Implementations:
/// - `OpenAiBackend` - OpenAI-compatible chat completions API
///
/// # Example
///
/// ```ignore
/// let llm: Arc<dyn LanguageModel> = Arc::new(OpenAiBackend::new(config)?);
/// let request = GenerateRequest::new("You are an IELTS examiner")
///     .with_user_message("Assess this answer: ...");
/// let response = llm.generate(request).await?;
/// println!("{}", response.text);
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Generate a completion
    ///
    /// # Arguments
    /// * `request` - Generation request with messages and parameters
    ///
    /// # Returns
    /// Generated response with text and metadata
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
