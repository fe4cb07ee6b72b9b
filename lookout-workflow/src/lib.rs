//! Quota-gated search workflow.
//!
//! ```text
//! Idle -> Checking -> Searching -> Crediting -> Done
//!            |            |            |
//!         Blocked       Failed       Failed
//! ```
//!
//! The user and profile are passed in by the caller on every run; nothing
//! is kept between runs. A fetched result stays in the report even when the
//! credit deduction afterwards fails, so display and error are independent.

pub mod orchestrator;

pub use orchestrator::{SearchContext, SearchOrchestrator};

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    Checking,
    Searching,
    Crediting,
    Done,
    Blocked,
    Failed,
}

impl SearchPhase {
    /// `Done`, `Blocked` or `Failed`. A blank query leaves a run in `Idle`,
    /// which is where it started rather than an outcome.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SearchPhase::Done | SearchPhase::Blocked | SearchPhase::Failed
        )
    }
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchPhase::Idle => "idle",
            SearchPhase::Checking => "checking",
            SearchPhase::Searching => "searching",
            SearchPhase::Crediting => "crediting",
            SearchPhase::Done => "done",
            SearchPhase::Blocked => "blocked",
            SearchPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Observable failures of a run.
///
/// The first two are pre-flight rejections: the backend is never contacted.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum WorkflowError {
    #[error("Please sign in to search.")]
    Unauthenticated,
    #[error("No searches remaining. Please purchase more.")]
    QuotaExhausted,
    #[error("{0}")]
    SearchFailed(String),
    #[error("{0}")]
    CreditDeductionFailed(String),
}

/// What happened to the credit for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    /// No search ran, or it found nothing.
    NotAttempted,
    Deducted,
    /// The store refused the write for lack of permission; the run still
    /// counts as a success.
    SuppressedPermissionDenied,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub phase: SearchPhase,
    /// Every phase entered, in order, ending with `phase`.
    pub trail: Vec<SearchPhase>,
    /// Fetched result, kept regardless of what happened afterwards.
    pub result: Option<Value>,
    pub credit: CreditStatus,
    pub error: Option<WorkflowError>,
}

impl SearchReport {
    /// A run that has not left `Idle`; what a blank query produces.
    pub fn idle(query: &str) -> Self {
        Self {
            query: query.trim().to_string(),
            phase: SearchPhase::Idle,
            trail: vec![SearchPhase::Idle],
            result: None,
            credit: CreditStatus::NotAttempted,
            error: None,
        }
    }

    /// Run refused at `Checking` because nobody is signed in.
    pub fn unauthenticated(query: &str) -> Self {
        let mut report = Self::idle(query);
        report.enter(SearchPhase::Checking);
        report.stop(SearchPhase::Blocked, WorkflowError::Unauthenticated)
    }

    fn enter(&mut self, phase: SearchPhase) {
        self.phase = phase;
        self.trail.push(phase);
    }

    fn stop(mut self, phase: SearchPhase, error: WorkflowError) -> Self {
        self.error = Some(error);
        self.enter(phase);
        self
    }

    fn done(mut self) -> Self {
        self.enter(SearchPhase::Done);
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// `true` when a search actually ran to completion.
    pub fn searched(&self) -> bool {
        self.trail.contains(&SearchPhase::Searching) && self.result.is_some()
    }
}
