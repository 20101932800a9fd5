//! Band-score normalization
//!
//! The generation collaborator is asked for a bare JSON document, but model
//! output drifts: markdown fences, leading prose, truncation. Whatever comes
//! back, the caller receives a well-formed score document; a completion that
//! does not parse is replaced by the fixed fallback, never surfaced as an
//! HTTP error.

use serde_json::{json, Value};

/// Parse the model's output into the band-score document.
///
/// Strips a surrounding markdown code fence before parsing. Returns the
/// fallback document when parsing fails or the result is not a JSON object.
pub fn normalize_feedback(raw: &str) -> Value {
    let cleaned = strip_code_fence(raw.trim());

    match serde_json::from_str::<Value>(cleaned) {
        Ok(value) if value.is_object() => value,
        Ok(other) => {
            tracing::warn!(got = %other, "generation output was valid JSON but not an object, using fallback");
            fallback_document()
        }
        Err(err) => {
            tracing::warn!(error = %err, "generation output did not parse as JSON, using fallback");
            fallback_document()
        }
    }
}

/// Remove one surrounding ``` fence pair, with an optional language tag
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line ("json", "JSON", or empty)
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// The deterministic document substituted when the model's output cannot be
/// parsed: all four sub-scores at zero, tagged with an internal error marker.
pub fn fallback_document() -> Value {
    fn empty_criterion() -> Value {
        json!({
            "band": 0,
            "strengths": [],
            "improvements": [],
            "examples": []
        })
    }

    json!({
        "error": true,
        "overallBand": 0,
        "criteria": {
            "fluencyAndCoherence": empty_criterion(),
            "lexicalResource": empty_criterion(),
            "grammaticalRangeAndAccuracy": empty_criterion(),
            "pronunciation": empty_criterion()
        },
        "nextBandTips": [],
        "summary": "The analysis could not be completed. Please try again."
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_passes_through() {
        let raw = r#"{"overallBand": 6.5, "summary": "Good effort"}"#;
        let value = normalize_feedback(raw);
        assert_eq!(value["overallBand"], 6.5);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_fenced_json_is_unwrapped() {
        let raw = "```json\n{\"overallBand\": 7.0}\n```";
        let value = normalize_feedback(raw);
        assert_eq!(value["overallBand"], 7.0);

        let raw = "```\n{\"overallBand\": 5.5}\n```";
        assert_eq!(normalize_feedback(raw)["overallBand"], 5.5);
    }

    #[test]
    fn test_truncated_json_yields_fallback() {
        let raw = r#"{"overallBand": 6.5, "criteria": {"fluencyAndCo"#;
        let value = normalize_feedback(raw);
        assert_eq!(value["error"], true);
        assert_eq!(value["overallBand"], 0);
    }

    #[test]
    fn test_non_object_json_yields_fallback() {
        assert_eq!(normalize_feedback("[1, 2, 3]")["error"], true);
        assert_eq!(normalize_feedback("\"just a string\"")["error"], true);
    }

    #[test]
    fn test_fallback_shape() {
        let doc = fallback_document();
        assert_eq!(doc["error"], true);
        assert_eq!(doc["overallBand"], 0);
        for criterion in [
            "fluencyAndCoherence",
            "lexicalResource",
            "grammaticalRangeAndAccuracy",
            "pronunciation",
        ] {
            assert_eq!(doc["criteria"][criterion]["band"], 0, "bad {criterion}");
        }
        assert!(doc["summary"]
            .as_str()
            .unwrap()
            .contains("could not be completed"));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let raw = "\n\n  {\"overallBand\": 8.0}  \n";
        assert_eq!(normalize_feedback(raw)["overallBand"], 8.0);
    }
}
