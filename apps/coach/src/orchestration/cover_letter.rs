use tracing::{info, warn};

use crate::errors::CoachError;
use crate::models::request::Operation;
use crate::scoring_client::wire::CoverLetterRequest;
use crate::state::Completion;

use super::Session;

impl Session {
    /// Generates a cover letter from the resume and job description alone;
    /// no evaluation is needed.
    ///
    /// Needs both inputs, otherwise nothing is sent and no state changes.
    /// A failure leaves any earlier letter (including user edits) in place.
    pub async fn generate_cover_letter(&self) -> Result<String, CoachError> {
        let state = self.store.get();
        if !state.input.has_job_description() {
            warn!("cover letter requested without a job description");
            return Err(CoachError::MissingJobDescription);
        }
        let Some(resume) = state.input.resume_file else {
            warn!("cover letter requested without a resume");
            return Err(CoachError::MissingResume);
        };

        let ticket = self.store.begin(Operation::CoverLetter, state.generation);
        info!(request_id = %ticket.request_id, "Requesting cover letter");

        let request = CoverLetterRequest {
            job_description: state.input.job_description,
            resume,
        };

        match self.service.cover_letter(&request).await {
            Ok(letter) => {
                self.install(&ticket, Completion::CoverLetter(letter.clone()))?;
                info!(
                    request_id = %ticket.request_id,
                    "Cover letter installed ({} chars)",
                    letter.len()
                );
                Ok(letter)
            }
            Err(err) => Err(self.fail(&ticket, err)),
        }
    }
}
