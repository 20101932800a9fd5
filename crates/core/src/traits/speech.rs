//! Speech-to-text trait

use crate::transcript::TranscriptResult;
use crate::Result;
use async_trait::async_trait;

/// Speech-to-Text interface
///
/// Implementations:
/// - `WhisperStt` - OpenAI-compatible hosted transcription API
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechToText> = Arc::new(WhisperStt::new(config)?);
/// let transcript = stt.transcribe(&audio_bytes, "answer.webm").await?;
/// println!("Transcribed: {}", transcript.text);
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Transcribe a complete recording, requesting word-level timing
    ///
    /// # Arguments
    /// * `audio` - Raw audio bytes as uploaded by the caller
    /// * `filename` - Original filename, used for container-format detection
    ///
    /// # Returns
    /// Transcript with text, word timestamps, and reported duration
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<TranscriptResult>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
