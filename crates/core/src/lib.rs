//! Core traits and types for the speaking feedback service
//!
//! This crate provides foundational types used across all other crates:
//! - Collaborator traits (speech-to-text, language model)
//! - Transcript types with word-level timing
//! - LLM request/response types
//! - Error types

pub mod error;
pub mod llm_types;
pub mod traits;
pub mod transcript;

pub use error::{Error, Result};
pub use transcript::{TranscriptResult, WordTimestamp};

pub use llm_types::{
    FinishReason, GenerateRequest, GenerateResponse, Message, Role, TokenUsage,
};

pub use traits::{LanguageModel, SpeechToText};
