//! Speech delivery analysis
//!
//! Derives pacing and disfluency statistics from the word-level timing the
//! transcription collaborator reports. The analyzer is a total function:
//! empty or degenerate timing data produces a canonical zero/unknown value,
//! never an error.

pub mod metrics;

pub use metrics::{
    analyze, PaceBucket, PacingVariation, SpeechMetrics, FILLER_WORDS, FAST_MIN_WPM,
    HALTING_PAUSE_RATIO, PAUSE_THRESHOLD_SECS, RUSHED_MIN_WPM, RUSHED_PAUSE_RATIO, SLOW_MAX_WPM,
};
