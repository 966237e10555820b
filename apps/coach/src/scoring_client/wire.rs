//! Request payloads and response-envelope decoding for the scoring service.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CoachError, UNSPECIFIED_SERVICE_MESSAGE};
use crate::models::candidate::ResumeFile;

pub const EVALUATE_PATH: &str = "/api/evaluate-candidate";
pub const GENERATE_PDF_PATH: &str = "/api/generate-pdf";
pub const COVER_LETTER_PATH: &str = "/api/cover-letter";
pub const STUDY_PLAN_PATH: &str = "/api/study-plan";

/// Multipart body of `POST /api/evaluate-candidate`.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub github_username: String,
    pub job_description: String,
    pub resume: ResumeFile,
}

/// Multipart body of `POST /api/cover-letter`.
#[derive(Debug, Clone)]
pub struct CoverLetterRequest {
    pub job_description: String,
    pub resume: ResumeFile,
}

/// JSON body of `POST /api/generate-pdf`. Every field is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub github_username: String,
    pub ats_score: f64,
    pub semantic_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub ai_scorecard: String,
}

/// JSON body of `POST /api/study-plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlanRequest {
    pub missing_skills: Vec<String>,
}

/// Decodes a `{status: "success" | "error", ...}` envelope.
///
/// On success the payload is read from `field`. Any other status is a
/// service error carrying the envelope's `message`. A body that is not a
/// JSON object, or a success envelope without a usable `field`, is a
/// transport error.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8], field: &str) -> Result<T, CoachError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| CoachError::Transport(format!("response is not valid JSON: {e}")))?;

    let Value::Object(mut envelope) = value else {
        return Err(CoachError::Transport(
            "response is not a JSON object".to_string(),
        ));
    };

    if envelope.get("status").and_then(Value::as_str) != Some("success") {
        let message = match envelope.remove("message") {
            Some(Value::String(message)) => message,
            Some(Value::Null) | None => UNSPECIFIED_SERVICE_MESSAGE.to_string(),
            Some(other) => other.to_string(),
        };
        return Err(CoachError::Service { message });
    }

    let payload = envelope
        .remove(field)
        .ok_or_else(|| CoachError::Transport(format!("success response is missing `{field}`")))?;

    serde_json::from_value(payload)
        .map_err(|e| CoachError::Transport(format!("malformed `{field}` in response: {e}")))
}
