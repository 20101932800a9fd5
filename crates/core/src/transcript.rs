//! Transcript types
//!
//! Normalized output of the transcription collaborator: recognized text plus
//! optional word-level timing. The analysis crate consumes these read-only.

use serde::{Deserialize, Serialize};

/// A recognized word with its time offsets within the recording.
///
/// Invariant: `start <= end`. Offsets are seconds from the start of the
/// audio, as reported by the transcription service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTimestamp {
    /// The recognized word text
    pub word: String,
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
}

impl WordTimestamp {
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }
}

/// Transcription result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptResult {
    /// Full transcribed text
    pub text: String,
    /// Word-level timestamps, empty if the service did not report them
    #[serde(default)]
    pub words: Vec<WordTimestamp>,
    /// Total audio duration in seconds, if the service reported it
    #[serde(default)]
    pub duration: Option<f64>,
}

impl TranscriptResult {
    /// Create a result from plain text with no timing information
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            words: Vec::new(),
            duration: None,
        }
    }
}
