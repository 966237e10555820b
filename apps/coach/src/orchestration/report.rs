//! PDF report generator: turns the current evaluation into a downloadable scorecard.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::errors::CoachError;
use crate::models::candidate::CandidateInput;
use crate::models::evaluation::{EvaluationResult, NO_SCORECARD_PLACEHOLDER};
use crate::models::request::Operation;
use crate::scoring_client::wire::ReportRequest;
use crate::state::Completion;

use super::Session;

const REPORT_FILE_SUFFIX: &str = "_AI_Scorecard.pdf";

/// Builds the PDF request from the evaluation alone, filling gaps with
/// fixed defaults: scores 0, lists empty, scorecard placeholder.
pub fn report_payload(github_username: &str, evaluation: &EvaluationResult) -> ReportRequest {
    let metrics = &evaluation.resume_metrics;
    ReportRequest {
        github_username: github_username.to_string(),
        ats_score: metrics.ats_score.unwrap_or(0.0),
        semantic_score: metrics.semantic_score.unwrap_or(0.0),
        matched_skills: metrics.matched_skills.clone(),
        missing_skills: metrics.missing_skills.clone(),
        ai_scorecard: metrics
            .ai_scorecard
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_SCORECARD_PLACEHOLDER)
            .to_string(),
    }
}

/// `<githubUsername or "Candidate">_AI_Scorecard.pdf`, with path separators
/// replaced so the name cannot escape the report directory.
pub fn report_file_name(input: &CandidateInput) -> String {
    let name: String = input
        .display_name()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{name}{REPORT_FILE_SUFFIX}")
}

impl Session {
    /// Downloads the PDF scorecard for the current evaluation into the
    /// session's report directory and returns the saved path.
    ///
    /// Without an evaluation this is a no-op returning `Ok(None)`.
    pub async fn download_report(&self) -> Result<Option<PathBuf>, CoachError> {
        let state = self.store.get();
        let Some(evaluation) = state.evaluation.as_ref() else {
            debug!("no evaluation to report on; skipping PDF download");
            return Ok(None);
        };

        let request = report_payload(&state.input.github_username, evaluation);
        let path = self.report_dir.join(report_file_name(&state.input));
        let ticket = self.store.begin(Operation::Report, state.generation);
        info!(request_id = %ticket.request_id, "Requesting PDF report");

        let pdf = match self.service.generate_pdf(&request).await {
            Ok(pdf) => pdf,
            Err(err) => return Err(self.fail(&ticket, err)),
        };

        let partial = path.with_extension("pdf.part");
        let written = match tokio::fs::create_dir_all(&self.report_dir).await {
            Ok(()) => tokio::fs::write(&partial, &pdf).await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(self.fail(&ticket, CoachError::Io(err)));
        }

        if !self.store.is_current(&ticket) {
            // The store discards the stale completion and resets the slot.
            let outcome = self.install(&ticket, Completion::Delivered).map(|_| None);
            let _ = tokio::fs::remove_file(&partial).await;
            return outcome;
        }

        // No await between the generation check and recording the outcome.
        if let Err(err) = std::fs::rename(&partial, &path) {
            return Err(self.fail(&ticket, CoachError::Io(err)));
        }

        self.install(&ticket, Completion::Delivered)?;
        info!(
            request_id = %ticket.request_id,
            "Saved PDF report to {} ({} bytes)",
            path.display(),
            pdf.len()
        );
        Ok(Some(path))
    }
}
