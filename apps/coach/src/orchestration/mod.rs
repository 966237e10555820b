// Session orchestration: one orchestrator per remote operation.
// Each derives its payload from a store snapshot, issues its request through
// `ScoringService`, and writes only its own slot(s) back via the store.

pub mod cover_letter;
pub mod evaluation;
pub mod report;
pub mod study_plan;

#[cfg(test)]
pub(crate) mod testing;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::errors::CoachError;
use crate::scoring_client::ScoringService;
use crate::state::{Applied, Completion, SessionState, SessionStore, Ticket};

pub use study_plan::StudyPlanOutcome;

/// A candidate session: the store plus the service its orchestrators call.
///
/// Cloning is cheap and clones share the same store, so operations can be
/// driven concurrently (e.g. with `tokio::join!`).
#[derive(Clone)]
pub struct Session {
    store: SessionStore,
    service: Arc<dyn ScoringService>,
    report_dir: PathBuf,
}

impl Session {
    pub fn new(service: Arc<dyn ScoringService>, report_dir: impl Into<PathBuf>) -> Self {
        Self::with_store(SessionStore::default(), service, report_dir)
    }

    pub fn with_store(
        store: SessionStore,
        service: Arc<dyn ScoringService>,
        report_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            service,
            report_dir: report_dir.into(),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn snapshot(&self) -> SessionState {
        self.store.get()
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Hands a successful result to the store. Errors with `Superseded`
    /// if the store discarded it as stale.
    fn install(&self, ticket: &Ticket, completion: Completion) -> Result<(), CoachError> {
        match self.store.complete(ticket, completion) {
            Applied::Installed => Ok(()),
            Applied::Discarded => {
                warn!(
                    request_id = %ticket.request_id,
                    "{} response arrived after a newer evaluation started; discarded",
                    ticket.operation
                );
                Err(CoachError::Superseded {
                    operation: ticket.operation,
                })
            }
        }
    }

    /// Records `err` as the operation's failure and returns the error the
    /// caller should see.
    fn fail(&self, ticket: &Ticket, err: CoachError) -> CoachError {
        match self.store.complete(ticket, Completion::Failed(err.failure())) {
            Applied::Installed => {
                warn!(request_id = %ticket.request_id, "{} failed: {err}", ticket.operation);
                err
            }
            Applied::Discarded => {
                warn!(
                    request_id = %ticket.request_id,
                    "stale {} failure ignored: {err}",
                    ticket.operation
                );
                CoachError::Superseded {
                    operation: ticket.operation,
                }
            }
        }
    }
}
