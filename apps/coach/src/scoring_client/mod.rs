//! Scoring client: the transport adapter between a session and the remote
//! scoring service.
//!
//! Orchestrators only ever talk to `dyn ScoringService`; `ScoringClient` is the
//! HTTP implementation. Every failure is normalised into `CoachError`:
//! envelope errors become `Service`, everything else `Transport`.
//! Nothing here retries; re-running an operation is up to the user.
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::CoachError;
use crate::models::candidate::ResumeFile;
use crate::models::evaluation::EvaluationResult;

pub mod wire;

use wire::{
    decode_envelope, CoverLetterRequest, EvaluationRequest, ReportRequest, StudyPlanRequest,
    COVER_LETTER_PATH, EVALUATE_PATH, GENERATE_PDF_PATH, STUDY_PLAN_PATH,
};

pub const USER_AGENT: &str = concat!("coach/", env!("CARGO_PKG_VERSION"));

/// One method per remote endpoint. Implement this to run sessions against
/// something other than HTTP (tests use an in-memory fake).
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn evaluate_candidate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, CoachError>;

    /// Returns the raw PDF bytes.
    async fn generate_pdf(&self, request: &ReportRequest) -> Result<Bytes, CoachError>;

    async fn cover_letter(&self, request: &CoverLetterRequest) -> Result<String, CoachError>;

    async fn study_plan(&self, request: &StudyPlanRequest) -> Result<String, CoachError>;
}

/// HTTP implementation of [`ScoringService`].
#[derive(Clone)]
pub struct ScoringClient {
    client: Client,
    base_url: String,
}

impl ScoringClient {
    pub fn new(config: &Config) -> Result<Self, CoachError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CoachError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
        field: &str,
    ) -> Result<T, CoachError> {
        let response = self.client.post(self.url(path)).multipart(form).send().await?;
        read_envelope(response, path, field).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl serde::Serialize,
        field: &str,
    ) -> Result<T, CoachError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        read_envelope(response, path, field).await
    }
}

/// Reads a JSON envelope regardless of HTTP status: the service reports its
/// own failures inside the body.
async fn read_envelope<T: DeserializeOwned>(
    response: Response,
    path: &str,
    field: &str,
) -> Result<T, CoachError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        warn!("{path} returned HTTP {status}, decoding envelope anyway");
    }
    debug!("{path} responded: status={status}, {} bytes", body.len());
    decode_envelope(&body, field)
}

fn resume_part(resume: &ResumeFile) -> Result<Part, CoachError> {
    Part::bytes(resume.bytes.to_vec())
        .file_name(resume.file_name.clone())
        .mime_str(&resume.content_type)
        .map_err(|e| CoachError::Transport(format!("invalid resume content type: {e}")))
}

#[async_trait]
impl ScoringService for ScoringClient {
    async fn evaluate_candidate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, CoachError> {
        let form = Form::new()
            .text("github_username", request.github_username.clone())
            .text("job_description", request.job_description.clone())
            .part("resume", resume_part(&request.resume)?);

        self.post_multipart(EVALUATE_PATH, form, "candidate_evaluation")
            .await
    }

    async fn generate_pdf(&self, request: &ReportRequest) -> Result<Bytes, CoachError> {
        let response = self
            .client
            .post(self.url(GENERATE_PDF_PATH))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoachError::Transport(format!(
                "{GENERATE_PDF_PATH} returned HTTP {status}"
            )));
        }

        let pdf = response.bytes().await?;
        debug!("{GENERATE_PDF_PATH} responded: {} bytes", pdf.len());
        Ok(pdf)
    }

    async fn cover_letter(&self, request: &CoverLetterRequest) -> Result<String, CoachError> {
        let form = Form::new()
            .text("job_description", request.job_description.clone())
            .part("resume", resume_part(&request.resume)?);

        self.post_multipart(COVER_LETTER_PATH, form, "cover_letter")
            .await
    }

    async fn study_plan(&self, request: &StudyPlanRequest) -> Result<String, CoachError> {
        self.post_json(STUDY_PLAN_PATH, request, "study_plan").await
    }
}
