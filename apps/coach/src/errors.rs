use thiserror::Error;

use crate::models::request::{Failure, FailureKind, Operation};

/// Shown in place of transport details; the underlying cause is logged.
pub const CONNECTIVITY_MESSAGE: &str =
    "Could not reach the scoring service. Is it running and reachable?";

/// Used when the service reports an error without saying why.
pub const UNSPECIFIED_SERVICE_MESSAGE: &str = "The scoring service reported an error";

/// Every way a session operation can end without installing its result.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("Please upload a PDF resume first")]
    MissingResume,

    #[error("A job description is required")]
    MissingJobDescription,

    #[error("No evaluation result is available yet")]
    NoEvaluation,

    #[error("Service error: {message}")]
    Service { message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{operation} response discarded: a newer evaluation has started")]
    Superseded { operation: Operation },

    #[error("Could not save report: {0}")]
    Io(#[from] std::io::Error),
}

impl CoachError {
    /// True for failures detected locally before any request was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            CoachError::MissingResume | CoachError::MissingJobDescription | CoachError::NoEvaluation
        )
    }

    /// The failure recorded in a `RequestState::Failed` for this error.
    pub fn failure(&self) -> Failure {
        match self {
            CoachError::Service { message } => Failure {
                kind: FailureKind::Service,
                message: message.clone(),
            },
            CoachError::Transport(_) => Failure {
                kind: FailureKind::Transport,
                message: CONNECTIVITY_MESSAGE.to_string(),
            },
            other => Failure {
                kind: FailureKind::Local,
                message: other.to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for CoachError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CoachError::Transport(format!("request timed out: {err}"))
        } else {
            CoachError::Transport(err.to_string())
        }
    }
}
