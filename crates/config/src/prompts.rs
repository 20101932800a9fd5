//! Assessment prompt configuration
//!
//! The fixed system instruction sent to the generation collaborator: the
//! examiner role, the four IELTS criteria, scoring rules, and the JSON
//! document shape the model must produce.

use serde::{Deserialize, Serialize};

/// Assessment rubric system prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentPrompt {
    /// Examiner role description
    pub role: String,
    /// Assessment criteria descriptors
    pub criteria: Vec<String>,
    /// Scoring rules
    pub scoring: Vec<String>,
    /// Feedback style guidelines
    pub guidelines: Vec<String>,
    /// Required response document shape, described to the model
    pub response_schema: String,
}

impl Default for AssessmentPrompt {
    fn default() -> Self {
        Self {
            role: "You are a certified IELTS speaking examiner. Assess the candidate's \
                   spoken answer against the official IELTS speaking band descriptors."
                .to_string(),
            criteria: vec![
                "Fluency and Coherence: speech rate, pausing, hesitation, discourse markers, \
                 topic development"
                    .to_string(),
                "Lexical Resource: vocabulary range, idiomatic language, paraphrase, word choice \
                 precision"
                    .to_string(),
                "Grammatical Range and Accuracy: sentence variety, tense control, error density"
                    .to_string(),
                "Pronunciation: intelligibility, word and sentence stress, intonation, \
                 individual sounds"
                    .to_string(),
            ],
            scoring: vec![
                "Award each criterion a band from 0 to 9, half bands allowed".to_string(),
                "The overall band is the average of the four criteria, rounded to the nearest \
                 half band"
                    .to_string(),
                "When delivery metrics are provided, weigh them in the Fluency and Coherence \
                 and Pronunciation bands"
                    .to_string(),
                "Be realistic: a short, hesitant answer with basic vocabulary is band 5, not \
                 band 7"
                    .to_string(),
            ],
            guidelines: vec![
                "Quote the candidate's own words when pointing out strengths or errors"
                    .to_string(),
                "Keep every feedback point concrete and actionable".to_string(),
                "Address the candidate directly as 'you'".to_string(),
            ],
            response_schema: r#"Respond with a single JSON object and nothing else. No markdown, no commentary. The object must match:
{
  "overallBand": number,
  "criteria": {
    "fluencyAndCoherence": {"band": number, "strengths": [string], "improvements": [string], "examples": [string]},
    "lexicalResource": {"band": number, "strengths": [string], "improvements": [string], "examples": [string]},
    "grammaticalRangeAndAccuracy": {"band": number, "strengths": [string], "improvements": [string], "examples": [string]},
    "pronunciation": {"band": number, "strengths": [string], "improvements": [string], "examples": [string]}
  },
  "nextBandTips": [string],
  "summary": string
}"#
            .to_string(),
        }
    }
}

impl AssessmentPrompt {
    /// Build the full system prompt text
    pub fn build(&self) -> String {
        let mut prompt = format!("{}\n\n", self.role);

        prompt.push_str("## Assessment Criteria\n");
        for criterion in &self.criteria {
            prompt.push_str(&format!("- {}\n", criterion));
        }

        prompt.push_str("\n## Scoring Rules\n");
        for rule in &self.scoring {
            prompt.push_str(&format!("- {}\n", rule));
        }

        prompt.push_str("\n## Feedback Guidelines\n");
        for guideline in &self.guidelines {
            prompt.push_str(&format!("- {}\n", guideline));
        }

        prompt.push_str("\n## Response Format\n");
        prompt.push_str(&self.response_schema);

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_contains_sections() {
        let prompt = AssessmentPrompt::default().build();
        assert!(prompt.contains("IELTS speaking examiner"));
        assert!(prompt.contains("## Assessment Criteria"));
        assert!(prompt.contains("## Scoring Rules"));
        assert!(prompt.contains("## Response Format"));
        assert!(prompt.contains("fluencyAndCoherence"));
        assert!(prompt.contains("overallBand"));
    }

    #[test]
    fn test_all_four_criteria_present() {
        let prompt = AssessmentPrompt::default().build();
        for criterion in [
            "Fluency and Coherence",
            "Lexical Resource",
            "Grammatical Range and Accuracy",
            "Pronunciation",
        ] {
            assert!(prompt.contains(criterion), "missing {criterion}");
        }
    }
}
