//! Session State Store: the single source of truth for one candidate session.
//!
//! Holds the candidate input, the current evaluation, the derived artifacts
//! and one `RequestSlot` per operation. Observers subscribe to a `watch`
//! channel and see every committed change.
//!
//! Staleness is decided here, not in the orchestrators: every request is
//! issued under a `Ticket` carrying the store's generation at submission
//! time, and `complete` drops any completion whose generation has since
//! been bumped by a new evaluation.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::models::candidate::{CandidateInput, ResumeFile};
use crate::models::evaluation::EvaluationResult;
use crate::models::request::{Failure, Operation, RequestSlot, RequestState};

/// Request bookkeeping, one slot per operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Requests {
    pub evaluate: RequestSlot,
    pub report: RequestSlot,
    pub cover_letter: RequestSlot,
    pub study_plan: RequestSlot,
}

impl Requests {
    pub fn slot(&self, operation: Operation) -> &RequestSlot {
        match operation {
            Operation::Evaluate => &self.evaluate,
            Operation::Report => &self.report,
            Operation::CoverLetter => &self.cover_letter,
            Operation::StudyPlan => &self.study_plan,
        }
    }

    fn slot_mut(&mut self, operation: Operation) -> &mut RequestSlot {
        match operation {
            Operation::Evaluate => &mut self.evaluate,
            Operation::Report => &mut self.report,
            Operation::CoverLetter => &mut self.cover_letter,
            Operation::StudyPlan => &mut self.study_plan,
        }
    }
}

/// Immutable snapshot of a session, as returned by [`SessionStore::get`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub input: CandidateInput,
    pub evaluation: Option<EvaluationResult>,
    pub cover_letter: Option<String>,
    pub study_plan: Option<String>,
    /// Bumped by every evaluation attempt.
    pub generation: u64,
    pub requests: Requests,
}

impl SessionState {
    pub fn request(&self, operation: Operation) -> &RequestState {
        &self.requests.slot(operation).state
    }

    /// Drops both derived artifacts. Their slots go back to `Idle` unless a
    /// request is still in flight; that request settles its slot itself.
    fn clear_artifacts(&mut self) {
        self.cover_letter = None;
        self.study_plan = None;
        for operation in [Operation::CoverLetter, Operation::StudyPlan] {
            let slot = self.requests.slot_mut(operation);
            if !matches!(slot.state, RequestState::Idle | RequestState::InFlight) {
                slot.transition(RequestState::Idle);
            }
        }
    }
}

/// User-originated edits. None of these touch results or request states.
#[derive(Debug, Clone)]
pub enum InputPatch {
    GithubUsername(String),
    JobDescription(String),
    ResumeFile(Option<ResumeFile>),
    /// In-place edit of the generated cover letter.
    CoverLetter(String),
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub operation: Operation,
    /// Store generation when the request was submitted.
    pub generation: u64,
    /// Per-operation sequence number.
    pub seq: u64,
    pub request_id: Uuid,
}

impl Ticket {
    fn new(operation: Operation) -> Self {
        Self {
            operation,
            generation: 0,
            seq: 0,
            request_id: Uuid::new_v4(),
        }
    }

    /// Stamps the ticket with `generation` and the next sequence number,
    /// and marks its operation in flight.
    fn issue(&mut self, state: &mut SessionState, generation: u64) {
        self.generation = generation;
        let slot = state.requests.slot_mut(self.operation);
        slot.latest_seq += 1;
        slot.transition(RequestState::InFlight);
        self.seq = slot.latest_seq;
    }
}

/// What an orchestrator hands back to the store when its request resolves.
#[derive(Debug, Clone)]
pub(crate) enum Completion {
    Evaluation(EvaluationResult),
    CoverLetter(String),
    StudyPlan(String),
    /// Succeeded without a store slot to write (the PDF report).
    Delivered,
    Failed(Failure),
}

/// Whether a completion was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Applied {
    Installed,
    Discarded,
}

/// Cheaply cloneable handle to the session state.
#[derive(Clone)]
pub struct SessionStore {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(CandidateInput::default())
    }
}

impl SessionStore {
    pub fn new(input: CandidateInput) -> Self {
        let (tx, _rx) = watch::channel(SessionState {
            input,
            ..Default::default()
        });
        Self { tx: Arc::new(tx) }
    }

    /// Returns an owned snapshot of the current state.
    pub fn get(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Returns a receiver that is notified on every committed change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Applies a user edit and notifies observers.
    pub fn set(&self, patch: InputPatch) {
        self.tx.send_modify(|state| match patch {
            InputPatch::GithubUsername(name) => state.input.github_username = name,
            InputPatch::JobDescription(text) => state.input.job_description = text,
            InputPatch::ResumeFile(file) => state.input.resume_file = file,
            InputPatch::CoverLetter(text) => state.cover_letter = Some(text),
        });
        debug!("session input updated");
    }

    /// Starts a new evaluation: bumps the generation and synchronously clears
    /// the evaluation and both derived artifacts before any request is sent.
    pub(crate) fn begin_evaluation(&self) -> Ticket {
        let mut ticket = Ticket::new(Operation::Evaluate);
        self.tx.send_modify(|state| {
            state.generation += 1;
            state.evaluation = None;
            state.clear_artifacts();
            let generation = state.generation;
            ticket.issue(state, generation);
        });
        debug!(generation = ticket.generation, "evaluation reset");
        ticket
    }

    /// Marks `operation` in flight and returns the ticket for its request.
    ///
    /// `basis` is the generation of the snapshot the request payload was
    /// derived from; if an evaluation has started since, the completion will
    /// be discarded.
    pub(crate) fn begin(&self, operation: Operation, basis: u64) -> Ticket {
        let mut ticket = Ticket::new(operation);
        self.tx.send_modify(|state| ticket.issue(state, basis));
        ticket
    }

    /// True while no evaluation has started since `ticket` was issued.
    pub(crate) fn is_current(&self, ticket: &Ticket) -> bool {
        self.tx.borrow().generation == ticket.generation
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Completions from an older generation are discarded. Artifact slots are
    /// last-resolve-wins; the request state only moves to a terminal state
    /// when `ticket` is the latest request issued for its operation.
    pub(crate) fn complete(&self, ticket: &Ticket, completion: Completion) -> Applied {
        let mut applied = Applied::Discarded;
        self.tx.send_if_modified(|state| {
            let is_latest = state.requests.slot(ticket.operation).latest_seq == ticket.seq;

            if ticket.generation != state.generation {
                if is_latest {
                    state
                        .requests
                        .slot_mut(ticket.operation)
                        .transition(RequestState::Idle);
                    return true;
                }
                return false;
            }

            let terminal = match completion {
                Completion::Evaluation(result) => {
                    state.evaluation = Some(result);
                    state.clear_artifacts();
                    RequestState::Succeeded
                }
                Completion::CoverLetter(text) => {
                    state.cover_letter = Some(text);
                    RequestState::Succeeded
                }
                Completion::StudyPlan(text) => {
                    state.study_plan = Some(text);
                    RequestState::Succeeded
                }
                Completion::Delivered => RequestState::Succeeded,
                Completion::Failed(failure) => RequestState::Failed(failure),
            };

            if is_latest {
                state.requests.slot_mut(ticket.operation).transition(terminal);
            }
            applied = Applied::Installed;
            true
        });

        debug!(
            operation = %ticket.operation,
            request_id = %ticket.request_id,
            generation = ticket.generation,
            applied = ?applied,
            "request completed"
        );
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::ResumeMetrics;
    use crate::models::request::FailureKind;

    fn evaluation(missing: &[&str]) -> EvaluationResult {
        EvaluationResult {
            resume_metrics: ResumeMetrics {
                ats_score: Some(70.0),
                missing_skills: missing.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            github_metrics: Default::default(),
        }
    }

    #[test]
    fn test_set_updates_input_only() {
        let store = SessionStore::default();
        store.set(InputPatch::GithubUsername("octocat".to_string()));
        store.set(InputPatch::JobDescription("Go backend engineer".to_string()));

        let state = store.get();
        assert_eq!(state.input.github_username, "octocat");
        assert_eq!(state.input.job_description, "Go backend engineer");
        assert_eq!(state.generation, 0);
        assert!(Operation::ALL
            .iter()
            .all(|op| *state.request(*op) == RequestState::Idle));
    }

    #[test]
    fn test_begin_evaluation_clears_result_and_artifacts() {
        let store = SessionStore::default();
        let ticket = store.begin_evaluation();
        store.complete(&ticket, Completion::Evaluation(evaluation(&["Rust"])));
        let letter = store.begin(Operation::CoverLetter, store.get().generation);
        store.complete(&letter, Completion::CoverLetter("Dear team".to_string()));
        let plan = store.begin(Operation::StudyPlan, store.get().generation);
        store.complete(&plan, Completion::StudyPlan("Week 1: Rust".to_string()));

        let next = store.begin_evaluation();
        let state = store.get();
        assert_eq!(next.generation, 2);
        assert!(state.evaluation.is_none());
        assert!(state.cover_letter.is_none());
        assert!(state.study_plan.is_none());
        assert!(state.request(Operation::Evaluate).is_in_flight());
        assert_eq!(*state.request(Operation::CoverLetter), RequestState::Idle);
        assert_eq!(*state.request(Operation::StudyPlan), RequestState::Idle);
    }

    #[test]
    fn test_installing_evaluation_invalidates_artifacts() {
        let store = SessionStore::default();
        let eval = store.begin_evaluation();
        let letter = store.begin(Operation::CoverLetter, store.get().generation);
        store.complete(&letter, Completion::CoverLetter("Dear team".to_string()));
        assert!(store.get().cover_letter.is_some());

        store.complete(&eval, Completion::Evaluation(evaluation(&[])));
        let state = store.get();
        assert!(state.cover_letter.is_none());
        assert!(state.evaluation.is_some());
        assert_eq!(*state.request(Operation::CoverLetter), RequestState::Idle);
    }

    #[test]
    fn test_installing_evaluation_keeps_pending_artifact_request_in_flight() {
        let store = SessionStore::default();
        let eval = store.begin_evaluation();
        let plan = store.begin(Operation::StudyPlan, store.get().generation);
        let letter = store.begin(Operation::CoverLetter, store.get().generation);
        store.complete(
            &letter,
            Completion::Failed(Failure {
                kind: FailureKind::Service,
                message: "no letter".to_string(),
            }),
        );

        store.complete(&eval, Completion::Evaluation(evaluation(&["Go"])));
        let state = store.get();
        assert_eq!(*state.request(Operation::CoverLetter), RequestState::Idle);
        assert!(state.request(Operation::StudyPlan).is_in_flight());

        store.complete(&plan, Completion::StudyPlan("Week 1: Go".to_string()));
        let state = store.get();
        assert_eq!(state.study_plan.as_deref(), Some("Week 1: Go"));
        assert_eq!(*state.request(Operation::StudyPlan), RequestState::Succeeded);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let store = SessionStore::default();
        let first = store.begin_evaluation();
        store.complete(&first, Completion::Evaluation(evaluation(&["Go"])));

        let plan = store.begin(Operation::StudyPlan, store.get().generation);
        store.begin_evaluation();

        let applied = store.complete(&plan, Completion::StudyPlan("stale".to_string()));
        assert_eq!(applied, Applied::Discarded);
        let state = store.get();
        assert!(state.study_plan.is_none());
        assert_eq!(*state.request(Operation::StudyPlan), RequestState::Idle);
    }

    #[test]
    fn test_ticket_keeps_generation_of_its_snapshot() {
        let store = SessionStore::default();
        let basis = store.get().generation;
        store.begin_evaluation();

        let letter = store.begin(Operation::CoverLetter, basis);
        assert!(!store.is_current(&letter));
        let applied = store.complete(&letter, Completion::CoverLetter("late".to_string()));
        assert_eq!(applied, Applied::Discarded);
        assert!(store.get().cover_letter.is_none());
    }

    #[test]
    fn test_older_overlapping_request_does_not_finish_slot() {
        let store = SessionStore::default();
        let first = store.begin(Operation::CoverLetter, store.get().generation);
        let second = store.begin(Operation::CoverLetter, store.get().generation);

        store.complete(&first, Completion::CoverLetter("first".to_string()));
        let state = store.get();
        assert_eq!(state.cover_letter.as_deref(), Some("first"));
        assert!(state.request(Operation::CoverLetter).is_in_flight());

        store.complete(
            &second,
            Completion::Failed(Failure {
                kind: FailureKind::Service,
                message: "quota".to_string(),
            }),
        );
        let state = store.get();
        assert_eq!(state.cover_letter.as_deref(), Some("first"));
        assert_eq!(
            state.request(Operation::CoverLetter).failure().map(|f| f.kind),
            Some(FailureKind::Service)
        );
    }

    #[test]
    fn test_cover_letter_edit_survives_other_operations() {
        let store = SessionStore::default();
        let letter = store.begin(Operation::CoverLetter, store.get().generation);
        store.complete(&letter, Completion::CoverLetter("Draft".to_string()));
        store.set(InputPatch::CoverLetter("Draft, edited".to_string()));

        let report = store.begin(Operation::Report, store.get().generation);
        store.complete(&report, Completion::Delivered);
        let plan = store.begin(Operation::StudyPlan, store.get().generation);
        store.complete(&plan, Completion::StudyPlan("Plan".to_string()));

        assert_eq!(store.get().cover_letter.as_deref(), Some("Draft, edited"));
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let store = SessionStore::default();
        let mut rx = store.subscribe();

        store.set(InputPatch::GithubUsername("octocat".to_string()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().input.github_username, "octocat");

        store.begin_evaluation();
        rx.changed().await.unwrap();
        assert!(rx.borrow().request(Operation::Evaluate).is_in_flight());
    }
}
