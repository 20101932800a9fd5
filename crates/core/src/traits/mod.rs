//! Collaborator traits
//!
//! Seams for the two external services the pipeline depends on. Backends are
//! pluggable so the server can run against hosted APIs in production and
//! mocks in tests.

pub mod llm;
pub mod speech;

pub use llm::LanguageModel;
pub use speech::SpeechToText;
