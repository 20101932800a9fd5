//! Speech metrics derivation
//!
//! The thresholds below are behavioral contracts for examiners reading the
//! output, not tuning knobs: changing them changes what "halting" or
//! "rushed" means in every report this service has ever produced.

use serde::{Serialize, Serializer};
use speakscore_core::WordTimestamp;

/// A gap between adjacent words must exceed this to count as a pause.
/// Strict: a gap of exactly 0.2 s is not a pause.
pub const PAUSE_THRESHOLD_SECS: f64 = 0.2;

/// More pauses than this fraction of the word count reads as halting.
pub const HALTING_PAUSE_RATIO: f64 = 0.3;

/// Fewer pauses than this fraction of the word count is a rushed signal,
/// together with [`RUSHED_MIN_WPM`].
pub const RUSHED_PAUSE_RATIO: f64 = 0.1;

/// Minimum words-per-minute for the rushed classification.
pub const RUSHED_MIN_WPM: u32 = 150;

/// Below this words-per-minute the pace reads as slow.
pub const SLOW_MAX_WPM: u32 = 120;

/// Above this words-per-minute the pace reads as fast.
pub const FAST_MIN_WPM: u32 = 160;

/// Disfluency tokens weighed against fluency.
///
/// Matching is exact against the lowercased, trimmed word. Multi-token
/// entries ("you know") only match when the transcription collaborator emits
/// them as a single token; adjacent single tokens are not joined.
pub const FILLER_WORDS: [&str; 8] = [
    "um",
    "uh",
    "like",
    "you know",
    "so",
    "basically",
    "actually",
    "literally",
];

/// Qualitative delivery bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PacingVariation {
    Steady,
    Halting,
    Rushed,
    Unknown,
}

impl PacingVariation {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacingVariation::Steady => "steady",
            PacingVariation::Halting => "halting",
            PacingVariation::Rushed => "rushed",
            PacingVariation::Unknown => "unknown",
        }
    }
}

/// Qualitative speech-rate bucket used in the generation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceBucket {
    Slow,
    Moderate,
    Fast,
}

impl PaceBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaceBucket::Slow => "slow",
            PaceBucket::Moderate => "moderate",
            PaceBucket::Fast => "fast",
        }
    }
}

/// Derived delivery statistics for one answer
///
/// Pause aggregates keep full precision internally; serialization rounds
/// them to two decimal places for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechMetrics {
    pub words_per_minute: u32,
    #[serde(serialize_with = "round_two_places")]
    pub average_pause_seconds: f64,
    #[serde(serialize_with = "round_two_places")]
    pub longest_pause_seconds: f64,
    pub filler_word_count: usize,
    pub pause_count: usize,
    pub pacing_variation: PacingVariation,
}

impl SpeechMetrics {
    /// Canonical value for an empty word sequence
    pub fn zero() -> Self {
        Self {
            words_per_minute: 0,
            average_pause_seconds: 0.0,
            longest_pause_seconds: 0.0,
            filler_word_count: 0,
            pause_count: 0,
            pacing_variation: PacingVariation::Unknown,
        }
    }

    /// Speech-rate bucket: below 120 wpm slow, above 160 fast, else moderate
    pub fn pace_bucket(&self) -> PaceBucket {
        if self.words_per_minute < SLOW_MAX_WPM {
            PaceBucket::Slow
        } else if self.words_per_minute > FAST_MIN_WPM {
            PaceBucket::Fast
        } else {
            PaceBucket::Moderate
        }
    }
}

fn round_two_places<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}

/// Derive delivery metrics from timed words and a total duration in seconds.
///
/// Total over its domain: an empty sequence returns [`SpeechMetrics::zero`],
/// a zero (or negative) duration yields a words-per-minute of 0, and
/// out-of-order timestamps simply produce no pauses.
pub fn analyze(words: &[WordTimestamp], duration: f64) -> SpeechMetrics {
    if words.is_empty() {
        return SpeechMetrics::zero();
    }

    let word_count = words.len();

    let filler_word_count = words
        .iter()
        .filter(|w| {
            let token = w.word.trim().to_lowercase();
            FILLER_WORDS.contains(&token.as_str())
        })
        .count();

    let pauses: Vec<f64> = words
        .windows(2)
        .filter_map(|pair| {
            let gap = pair[1].start - pair[0].end;
            (gap > PAUSE_THRESHOLD_SECS).then_some(gap)
        })
        .collect();

    let pause_count = pauses.len();
    let average_pause_seconds = if pauses.is_empty() {
        0.0
    } else {
        pauses.iter().sum::<f64>() / pauses.len() as f64
    };
    let longest_pause_seconds = pauses.iter().copied().fold(0.0, f64::max);

    let words_per_minute = if duration > 0.0 {
        (word_count as f64 / duration * 60.0).round() as u32
    } else {
        0
    };

    // First match wins: halting takes precedence over rushed.
    let pacing_variation = if pause_count as f64 > HALTING_PAUSE_RATIO * word_count as f64 {
        PacingVariation::Halting
    } else if (pause_count as f64) < RUSHED_PAUSE_RATIO * word_count as f64
        && words_per_minute > RUSHED_MIN_WPM
    {
        PacingVariation::Rushed
    } else {
        PacingVariation::Steady
    };

    SpeechMetrics {
        words_per_minute,
        average_pause_seconds,
        longest_pause_seconds,
        filler_word_count,
        pause_count,
        pacing_variation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64, end: f64) -> WordTimestamp {
        WordTimestamp::new(text, start, end)
    }

    /// Evenly spaced words with no gaps, `n` of them over `secs` seconds
    fn continuous_words(n: usize, secs: f64) -> Vec<WordTimestamp> {
        let step = secs / n as f64;
        (0..n)
            .map(|i| word("word", i as f64 * step, (i + 1) as f64 * step))
            .collect()
    }

    #[test]
    fn test_empty_sequence_is_canonical_zero() {
        let metrics = analyze(&[], 10.0);
        assert_eq!(metrics, SpeechMetrics::zero());
        assert_eq!(metrics.pacing_variation, PacingVariation::Unknown);
    }

    #[test]
    fn test_zero_duration_does_not_divide() {
        let words = vec![word("a", 0.0, 0.1), word("b", 0.1, 0.2)];
        let metrics = analyze(&words, 0.0);
        assert_eq!(metrics.words_per_minute, 0);
    }

    #[test]
    fn test_pause_threshold_is_strict() {
        // Gap of exactly 0.2 s: not a pause
        let words = vec![word("a", 0.0, 0.1), word("b", 0.3, 0.4)];
        assert_eq!(analyze(&words, 1.0).pause_count, 0);

        // Gap of 0.2001 s: a pause
        let words = vec![word("a", 0.0, 0.1), word("b", 0.3001, 0.4)];
        let metrics = analyze(&words, 1.0);
        assert_eq!(metrics.pause_count, 1);
        assert!((metrics.longest_pause_seconds - 0.2001).abs() < 1e-9);
    }

    #[test]
    fn test_spec_example() {
        let words = vec![
            word("the", 0.0, 0.1),
            word("quick", 0.1, 0.2),
            word("brown", 0.9, 1.0),
        ];
        let metrics = analyze(&words, 2.0);
        assert_eq!(metrics.words_per_minute, 90);
        assert_eq!(metrics.pause_count, 1);
        assert!((metrics.longest_pause_seconds - 0.7).abs() < 1e-9);
        assert!((metrics.average_pause_seconds - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_filler_matching_case_insensitive_and_trimmed() {
        let words = vec![
            word("Um ", 0.0, 0.1),
            word("um", 0.1, 0.2),
            word("UM", 0.2, 0.3),
            word("hello", 0.3, 0.4),
        ];
        let metrics = analyze(&words, 1.0);
        assert_eq!(metrics.filler_word_count, 3);
    }

    #[test]
    fn test_multi_token_filler_only_as_single_token() {
        // "you know" as one token matches; as two tokens it does not
        let joined = vec![word("you know", 0.0, 0.4)];
        assert_eq!(analyze(&joined, 1.0).filler_word_count, 1);

        let split = vec![word("you", 0.0, 0.2), word("know", 0.2, 0.4)];
        assert_eq!(analyze(&split, 1.0).filler_word_count, 0);
    }

    #[test]
    fn test_halting_wins_over_rushed_signals() {
        // Fast delivery (wpm > 150) but pauses over the halting ratio:
        // classification is order-sensitive and halting matches first.
        let words = vec![
            word("a", 0.0, 0.1),
            word("b", 0.5, 0.6),
            word("c", 1.0, 1.1),
            word("d", 1.5, 1.6),
        ];
        let metrics = analyze(&words, 1.0);
        assert!(metrics.words_per_minute > RUSHED_MIN_WPM);
        assert!(metrics.pause_count as f64 > HALTING_PAUSE_RATIO * words.len() as f64);
        assert_eq!(metrics.pacing_variation, PacingVariation::Halting);
    }

    #[test]
    fn test_rushed_classification() {
        // 20 words in 5 s with no pauses: 240 wpm, zero pause ratio
        let metrics = analyze(&continuous_words(20, 5.0), 5.0);
        assert_eq!(metrics.words_per_minute, 240);
        assert_eq!(metrics.pause_count, 0);
        assert_eq!(metrics.pacing_variation, PacingVariation::Rushed);
    }

    #[test]
    fn test_steady_classification() {
        // 20 words in 10 s: 120 wpm, not rushed, no pauses
        let metrics = analyze(&continuous_words(20, 10.0), 10.0);
        assert_eq!(metrics.words_per_minute, 120);
        assert_eq!(metrics.pacing_variation, PacingVariation::Steady);
    }

    #[test]
    fn test_single_word_has_no_pauses() {
        let metrics = analyze(&[word("hello", 0.0, 0.5)], 1.0);
        assert_eq!(metrics.pause_count, 0);
        assert_eq!(metrics.average_pause_seconds, 0.0);
        assert_eq!(metrics.longest_pause_seconds, 0.0);
        assert_eq!(metrics.pacing_variation, PacingVariation::Steady);
    }

    #[test]
    fn test_pace_buckets() {
        let mut metrics = SpeechMetrics::zero();
        metrics.words_per_minute = 119;
        assert_eq!(metrics.pace_bucket(), PaceBucket::Slow);
        metrics.words_per_minute = 120;
        assert_eq!(metrics.pace_bucket(), PaceBucket::Moderate);
        metrics.words_per_minute = 160;
        assert_eq!(metrics.pace_bucket(), PaceBucket::Moderate);
        metrics.words_per_minute = 161;
        assert_eq!(metrics.pace_bucket(), PaceBucket::Fast);
    }

    #[test]
    fn test_serialization_shape_and_rounding() {
        let words = vec![
            word("a", 0.0, 0.1),
            word("b", 0.4333333, 0.5),
            word("c", 1.1, 1.2),
        ];
        let metrics = analyze(&words, 2.0);
        let json = serde_json::to_value(&metrics).unwrap();

        assert!(json.get("wordsPerMinute").is_some());
        assert!(json.get("pacingVariation").is_some());
        // Two pauses: 0.3333333 and 0.6 -> average 0.46666, rounded to 0.47
        assert_eq!(json["averagePauseSeconds"], 0.47);
        assert_eq!(json["longestPauseSeconds"], 0.6);
        // Two pauses over three words exceeds the halting ratio
        assert_eq!(json["pacingVariation"], "halting");
        // Internal value keeps full precision
        assert!((metrics.average_pause_seconds - 0.4666666).abs() > 0.0);
        assert!(metrics.average_pause_seconds > 0.466 && metrics.average_pause_seconds < 0.467);
    }
}
