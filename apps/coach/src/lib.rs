//! Client for the candidate scoring service.
//!
//! A [`Session`] owns one candidate's state and drives four independent
//! remote operations against it: evaluation, PDF report, cover letter and
//! study plan. See [`state`] for how overlapping requests are reconciled.

pub mod config;
pub mod errors;
pub mod models;
pub mod orchestration;
pub mod render;
pub mod scoring_client;
pub mod state;

pub use errors::CoachError;
pub use models::candidate::{CandidateInput, ResumeFile};
pub use models::evaluation::{EvaluationResult, GithubMetrics, ResumeMetrics};
pub use models::request::{Failure, FailureKind, Operation, RequestState};
pub use orchestration::{Session, StudyPlanOutcome};
pub use scoring_client::{ScoringClient, ScoringService};
pub use state::{InputPatch, SessionState, SessionStore};
