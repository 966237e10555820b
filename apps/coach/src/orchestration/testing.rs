//! In-memory `ScoringService` for orchestrator tests.
//!
//! Each endpoint replays scripted replies in order and records the requests
//! it saw. A reply can be held behind a gate so tests decide exactly when a
//! response "arrives" relative to other operations.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::oneshot;

use crate::errors::CoachError;
use crate::models::candidate::{CandidateInput, ResumeFile};
use crate::models::evaluation::{EvaluationResult, GithubMetrics, ResumeMetrics};
use crate::scoring_client::wire::{
    CoverLetterRequest, EvaluationRequest, ReportRequest, StudyPlanRequest,
};
use crate::scoring_client::ScoringService;
use crate::state::SessionStore;

use super::Session;

#[derive(Debug, Clone)]
pub(crate) enum Reply<T> {
    Ok(T),
    Service(&'static str),
    Transport,
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, CoachError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Service(message) => Err(CoachError::Service {
                message: message.to_string(),
            }),
            Reply::Transport => Err(CoachError::Transport("connection refused".to_string())),
        }
    }
}

struct Scripted<T> {
    reply: Reply<T>,
    gate: Option<oneshot::Receiver<()>>,
}

pub(crate) struct Endpoint<Req, T> {
    script: Mutex<VecDeque<Scripted<T>>>,
    seen: Mutex<Vec<Req>>,
}

impl<Req: Clone, T> Default for Endpoint<Req, T> {
    fn default() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl<Req: Clone, T> Endpoint<Req, T> {
    pub fn push(&self, reply: Reply<T>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted { reply, gate: None });
    }

    /// Queues a reply that is only returned once the sender fires.
    pub fn push_gated(&self, reply: Reply<T>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(Scripted {
            reply,
            gate: Some(rx),
        });
        tx
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Req> {
        self.seen.lock().unwrap().clone()
    }

    async fn call(&self, request: &Req) -> Result<T, CoachError> {
        self.seen.lock().unwrap().push(request.clone());
        let scripted = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected call: no reply scripted");
        if let Some(gate) = scripted.gate {
            gate.await.expect("gate dropped without firing");
        }
        scripted.reply.into_result()
    }
}

#[derive(Default)]
pub(crate) struct FakeService {
    pub evaluate: Endpoint<EvaluationRequest, EvaluationResult>,
    pub pdf: Endpoint<ReportRequest, Bytes>,
    pub cover_letter: Endpoint<CoverLetterRequest, String>,
    pub study_plan: Endpoint<StudyPlanRequest, String>,
}

impl FakeService {
    pub fn total_calls(&self) -> usize {
        self.evaluate.calls()
            + self.pdf.calls()
            + self.cover_letter.calls()
            + self.study_plan.calls()
    }
}

#[async_trait]
impl ScoringService for FakeService {
    async fn evaluate_candidate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EvaluationResult, CoachError> {
        self.evaluate.call(request).await
    }

    async fn generate_pdf(&self, request: &ReportRequest) -> Result<Bytes, CoachError> {
        self.pdf.call(request).await
    }

    async fn cover_letter(&self, request: &CoverLetterRequest) -> Result<String, CoachError> {
        self.cover_letter.call(request).await
    }

    async fn study_plan(&self, request: &StudyPlanRequest) -> Result<String, CoachError> {
        self.study_plan.call(request).await
    }
}

pub(crate) fn resume() -> ResumeFile {
    ResumeFile::new("octocat.pdf", b"%PDF-1.7 resume".to_vec())
}

pub(crate) fn octocat_input() -> CandidateInput {
    CandidateInput {
        github_username: "octocat".to_string(),
        job_description: "Go backend engineer".to_string(),
        resume_file: Some(resume()),
    }
}

pub(crate) fn evaluation(missing: &[&str]) -> EvaluationResult {
    EvaluationResult {
        resume_metrics: ResumeMetrics {
            ats_score: Some(82.0),
            semantic_score: Some(0.71),
            matched_skills: vec!["Go".to_string(), "Docker".to_string()],
            missing_skills: missing.iter().map(|s| s.to_string()).collect(),
            ai_scorecard: Some("Strong backend fit.".to_string()),
        },
        github_metrics: GithubMetrics::default(),
    }
}

/// A session over a fresh fake, seeded with `input`, saving reports to `report_dir`.
pub(crate) fn session_with(
    input: CandidateInput,
    report_dir: &std::path::Path,
) -> (Session, Arc<FakeService>) {
    let fake = Arc::new(FakeService::default());
    let session = Session::with_store(SessionStore::new(input), fake.clone(), report_dir);
    (session, fake)
}

/// Runs one successful evaluation so generators have something to work from.
pub(crate) async fn evaluated_session(
    missing: &[&str],
    report_dir: &std::path::Path,
) -> (Session, Arc<FakeService>) {
    let (session, fake) = session_with(octocat_input(), report_dir);
    fake.evaluate.push(Reply::Ok(evaluation(missing)));
    session.evaluate().await.unwrap();
    (session, fake)
}
