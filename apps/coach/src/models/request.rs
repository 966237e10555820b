use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The four independently tracked remote operations of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Evaluate,
    Report,
    CoverLetter,
    StudyPlan,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Evaluate,
        Operation::Report,
        Operation::CoverLetter,
        Operation::StudyPlan,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Operation::Evaluate => "evaluation",
            Operation::Report => "PDF report",
            Operation::CoverLetter => "cover letter",
            Operation::StudyPlan => "study plan",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The service answered with `status: "error"`.
    Service,
    /// Network failure, timeout, malformed body or non-2xx on a binary endpoint.
    Transport,
    /// Failed on this side after the response arrived (e.g. saving a file).
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

/// Lifecycle of one operation: `Idle → InFlight → {Succeeded, Failed}`,
/// re-entering `InFlight` whenever the operation is triggered again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(Failure),
}

impl RequestState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::InFlight)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            RequestState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestState::Idle => f.write_str("idle"),
            RequestState::InFlight => f.write_str("in flight"),
            RequestState::Succeeded => f.write_str("succeeded"),
            RequestState::Failed(failure) => write!(f, "failed: {}", failure.message),
        }
    }
}

/// Per-operation bookkeeping kept in the session store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSlot {
    pub state: RequestState,
    /// Sequence number of the most recently issued request for this operation.
    pub latest_seq: u64,
    pub changed_at: DateTime<Utc>,
}

impl Default for RequestSlot {
    fn default() -> Self {
        Self {
            state: RequestState::Idle,
            latest_seq: 0,
            changed_at: Utc::now(),
        }
    }
}

impl RequestSlot {
    pub(crate) fn transition(&mut self, state: RequestState) {
        self.state = state;
        self.changed_at = Utc::now();
    }
}
