//! Examiner prompt assembly
//!
//! Builds the generation request for one submission: the fixed rubric as the
//! system instruction, and a user message carrying the question, part number,
//! the delivery-metrics block (audio submissions only), and the transcript.

use speakscore_analysis::SpeechMetrics;
use speakscore_core::GenerateRequest;

/// Prompt builder for one feedback request
pub struct PromptBuilder {
    system: String,
    question: String,
    part: String,
    metrics_block: Option<String>,
    transcript: String,
}

impl PromptBuilder {
    /// Create a builder with the rubric system instruction
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            question: String::new(),
            part: String::new(),
            metrics_block: None,
            transcript: String::new(),
        }
    }

    /// Set the speaking question
    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    /// Set the test part ("1", "2" or "3")
    pub fn part(mut self, part: impl Into<String>) -> Self {
        self.part = part.into();
        self
    }

    /// Attach the delivery-metrics block derived from audio timing
    pub fn with_metrics(mut self, metrics: &SpeechMetrics) -> Self {
        self.metrics_block = Some(format_metrics_block(metrics));
        self
    }

    /// Set the candidate's transcript
    pub fn transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = transcript.into();
        self
    }

    /// Build the generation request
    pub fn build(self) -> GenerateRequest {
        let mut user = format!("Question (Part {}): {}\n\n", self.part, self.question);

        match &self.metrics_block {
            Some(block) => {
                user.push_str("## Delivery Metrics\n");
                user.push_str("Measured from the audio recording:\n");
                user.push_str(block);
                user.push_str("\n\n## Candidate's Answer\n");
                user.push_str(&self.transcript);
            }
            None => {
                user.push_str("## Candidate's Answer\n");
                user.push_str(&self.transcript);
                user.push_str(
                    "\n\nNo audio recording was submitted; pronunciation feedback must be \
                     inferred from text patterns only.",
                );
            }
        }

        GenerateRequest::new(self.system).with_user_message(user)
    }
}

/// Render the natural-language metrics block embedded in the prompt
fn format_metrics_block(metrics: &SpeechMetrics) -> String {
    format!(
        "- Pace: {} words per minute ({})\n\
         - Delivery: {}\n\
         - Pauses: {} noticeable pauses (average {:.2} s, longest {:.2} s)\n\
         - Filler words: {}",
        metrics.words_per_minute,
        metrics.pace_bucket().as_str(),
        metrics.pacing_variation.as_str(),
        metrics.pause_count,
        metrics.average_pause_seconds,
        metrics.longest_pause_seconds,
        metrics.filler_word_count,
    )
}
