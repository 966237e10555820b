use tracing::{info, warn};

use crate::errors::CoachError;
use crate::models::request::Operation;
use crate::scoring_client::wire::StudyPlanRequest;
use crate::state::Completion;

use super::Session;

/// Result of asking for a study plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyPlanOutcome {
    Planned(String),
    /// The evaluation found no missing skills; nothing was requested.
    FullyQualified,
}

impl Session {
    /// Requests a study plan covering the current evaluation's missing skills.
    ///
    /// Needs an evaluation (`NoEvaluation` otherwise). An empty missing-skills
    /// list short-circuits to `FullyQualified` without a request.
    pub async fn generate_study_plan(&self) -> Result<StudyPlanOutcome, CoachError> {
        let state = self.store.get();
        let Some(evaluation) = state.evaluation else {
            warn!("study plan requested before any evaluation");
            return Err(CoachError::NoEvaluation);
        };
        if evaluation.is_fully_qualified() {
            info!("No missing skills; candidate is fully qualified");
            return Ok(StudyPlanOutcome::FullyQualified);
        }

        let request = StudyPlanRequest {
            missing_skills: evaluation.resume_metrics.missing_skills,
        };
        let ticket = self.store.begin(Operation::StudyPlan, state.generation);
        info!(
            request_id = %ticket.request_id,
            "Requesting study plan for {} missing skills",
            request.missing_skills.len()
        );

        match self.service.study_plan(&request).await {
            Ok(plan) => {
                self.install(&ticket, Completion::StudyPlan(plan.clone()))?;
                Ok(StudyPlanOutcome::Planned(plan))
            }
            Err(err) => Err(self.fail(&ticket, err)),
        }
    }
}
