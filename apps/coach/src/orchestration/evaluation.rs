//! Evaluation orchestrator: submits resume + metadata and installs the result.

use tracing::{info, warn};

use crate::errors::CoachError;
use crate::models::evaluation::EvaluationResult;
use crate::scoring_client::wire::EvaluationRequest;
use crate::state::Completion;

use super::Session;

impl Session {
    /// Evaluates the candidate currently held in the store.
    ///
    /// Without a resume this fails with `MissingResume` and sends nothing.
    /// Otherwise the previous result and both derived artifacts are cleared
    /// before the request goes out, and the new result replaces them on
    /// success. A response overtaken by a later `evaluate()` is discarded.
    pub async fn evaluate(&self) -> Result<EvaluationResult, CoachError> {
        let input = self.store.get().input;
        let Some(resume) = input.resume_file else {
            warn!("evaluation requested without a resume");
            return Err(CoachError::MissingResume);
        };

        let ticket = self.store.begin_evaluation();
        info!(
            request_id = %ticket.request_id,
            generation = ticket.generation,
            "Submitting candidate evaluation ({}, {} bytes)",
            resume.file_name,
            resume.bytes.len()
        );

        let request = EvaluationRequest {
            github_username: input.github_username,
            job_description: input.job_description,
            resume,
        };

        match self.service.evaluate_candidate(&request).await {
            Ok(result) => {
                self.install(&ticket, Completion::Evaluation(result.clone()))?;
                info!(
                    request_id = %ticket.request_id,
                    "Evaluation installed: {} matched, {} missing skills",
                    result.resume_metrics.matched_skills.len(),
                    result.resume_metrics.missing_skills.len()
                );
                Ok(result)
            }
            Err(err) => Err(self.fail(&ticket, err)),
        }
    }
}
