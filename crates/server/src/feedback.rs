//! Feedback request orchestration
//!
//! The one nontrivial handler: validate the submission, run the audio or
//! text branch through the collaborators, and normalize whatever comes back
//! into the response document. Once inputs are valid the caller always gets
//! a 200 with a best-effort or fallback body; only collaborator transport
//! failures surface as HTTP errors.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use speakscore_analysis::{analyze, SpeechMetrics};
use speakscore_llm::{normalize_feedback, PromptBuilder};

use crate::multipart;
use crate::state::AppState;
use crate::ApiError;

/// Question used when the caller does not supply one
pub const DEFAULT_QUESTION: &str = "IELTS Speaking Question";
/// Test part used when the caller does not supply one
pub const DEFAULT_PART: &str = "1";

/// Normalized response document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    /// Band-score document from the generation collaborator, or the fallback
    pub ielts_scores: Value,
    pub transcript: String,
    /// Present only for audio submissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<SpeechMetrics>,
    pub question: String,
    pub part: String,
}

/// Text-only submission body
#[derive(Debug, Deserialize)]
struct TextSubmission {
    #[serde(default)]
    text: String,
    question: Option<String>,
    part: Option<String>,
}

/// `POST /api/feedback`
pub async fn feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    handle(state, headers, body)
        .instrument(tracing::info_span!("feedback", %request_id))
        .await
        .map(Json)
}

async fn handle(
    state: AppState,
    headers: HeaderMap,
    body: Bytes,
) -> Result<FeedbackResponse, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        audio_submission(&state, content_type, &body).await
    } else {
        text_submission(&state, &body).await
    }
}

/// Audio branch: decode, transcribe, analyze, generate
async fn audio_submission(
    state: &AppState,
    content_type: &str,
    body: &[u8],
) -> Result<FeedbackResponse, ApiError> {
    let form = multipart::parse(body, content_type)
        .map_err(|err| ApiError::BadRequest(err.to_string()))?;

    let audio = form
        .file("audio")
        .ok_or_else(|| ApiError::BadRequest("No audio file provided".to_string()))?;

    let question = non_blank(form.field("question")).unwrap_or(DEFAULT_QUESTION).to_string();
    let part = non_blank(form.field("part")).unwrap_or(DEFAULT_PART).to_string();
    let declared_duration = form
        .field("duration")
        .and_then(|value| value.trim().parse::<f64>().ok());

    tracing::info!(
        bytes = audio.bytes.len(),
        filename = %audio.filename,
        "transcribing audio submission"
    );
    let transcript = state.stt.transcribe(&audio.bytes, &audio.filename).await?;

    // Caller-declared duration wins over what the transcriber reports
    let duration = declared_duration.or(transcript.duration).unwrap_or(0.0);
    let metrics = analyze(&transcript.words, duration);
    tracing::debug!(
        wpm = metrics.words_per_minute,
        pauses = metrics.pause_count,
        fillers = metrics.filler_word_count,
        pacing = metrics.pacing_variation.as_str(),
        "derived delivery metrics"
    );

    let request = PromptBuilder::new(state.rubric.build())
        .question(&question)
        .part(&part)
        .with_metrics(&metrics)
        .transcript(&transcript.text)
        .build()
        .with_temperature(state.settings.generation.temperature)
        .with_max_tokens(state.settings.generation.max_tokens);

    let generated = state.llm.generate(request).await?;
    let ielts_scores = normalize_feedback(&generated.text);

    Ok(FeedbackResponse {
        ielts_scores,
        transcript: transcript.text,
        metrics: Some(metrics),
        question,
        part,
    })
}

/// Text branch: no decoding, no metrics
async fn text_submission(state: &AppState, body: &[u8]) -> Result<FeedbackResponse, ApiError> {
    let submission: TextSubmission = serde_json::from_slice(body)
        .map_err(|_| ApiError::BadRequest("No answer text provided".to_string()))?;

    if submission.text.trim().is_empty() {
        return Err(ApiError::BadRequest("No answer text provided".to_string()));
    }

    let question = non_blank(submission.question.as_deref())
        .unwrap_or(DEFAULT_QUESTION)
        .to_string();
    let part = non_blank(submission.part.as_deref()).unwrap_or(DEFAULT_PART).to_string();

    tracing::info!(chars = submission.text.len(), "assessing text submission");

    let request = PromptBuilder::new(state.rubric.build())
        .question(&question)
        .part(&part)
        .transcript(&submission.text)
        .build()
        .with_temperature(state.settings.generation.temperature)
        .with_max_tokens(state.settings.generation.max_tokens);

    let generated = state.llm.generate(request).await?;
    let ielts_scores = normalize_feedback(&generated.text);

    Ok(FeedbackResponse {
        ielts_scores,
        transcript: submission.text,
        metrics: None,
        question,
        part,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
