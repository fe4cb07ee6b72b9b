use lookout_accounts::{CreditError, CreditLedger, Profile, QuotaGate, Session, compute_remaining};
use lookout_search::SearchBackend;
use std::sync::Arc;

use crate::{CreditStatus, SearchPhase, SearchReport, WorkflowError};

const SEARCH_ERROR_FALLBACK: &str = "Search error.";

/// Caller-resolved identity and account state for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchContext<'a> {
    pub session: Option<&'a Session>,
    pub profile: Option<&'a Profile>,
}

impl<'a> SearchContext<'a> {
    pub fn new(session: Option<&'a Session>, profile: Option<&'a Profile>) -> Self {
        Self { session, profile }
    }

    pub fn remaining(&self) -> f64 {
        compute_remaining(self.profile)
    }
}

/// Runs check, search and credit strictly in sequence.
///
/// Holds no per-run state and no lock: preventing overlapping runs for the
/// same user is up to the caller.
pub struct SearchOrchestrator {
    backend: Arc<dyn SearchBackend>,
    ledger: Arc<dyn CreditLedger>,
    credit_cost: u32,
}

impl SearchOrchestrator {
    pub fn new(backend: Arc<dyn SearchBackend>, ledger: Arc<dyn CreditLedger>) -> Self {
        Self {
            backend,
            ledger,
            credit_cost: 1,
        }
    }

    /// Credits spent per search that returns results.
    pub fn with_credit_cost(mut self, cost: u32) -> Self {
        self.credit_cost = cost;
        self
    }

    pub async fn run(&self, ctx: &SearchContext<'_>, query: &str) -> SearchReport {
        let query = query.trim();
        let mut report = SearchReport::idle(query);
        if query.is_empty() {
            tracing::debug!("search.skipped.blank_query");
            return report;
        }

        let Some(session) = ctx.session else {
            tracing::info!("search.blocked.unauthenticated");
            return SearchReport::unauthenticated(query);
        };
        report.enter(SearchPhase::Checking);
        let user = &session.user_id;
        let remaining = match QuotaGate::check(ctx.remaining()) {
            Ok(remaining) => remaining,
            Err(denied) => {
                tracing::info!(user = %user, remaining = denied.remaining, "search.blocked.quota");
                return report.stop(SearchPhase::Blocked, WorkflowError::QuotaExhausted);
            }
        };

        report.enter(SearchPhase::Searching);
        tracing::info!(user = %user, remaining, "search.start");
        let outcome = match self.backend.search(query).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let mut message = err.user_message();
                if message.trim().is_empty() {
                    message = SEARCH_ERROR_FALLBACK.to_string();
                }
                tracing::warn!(user = %user, error = %err, "search.failed");
                return report.stop(SearchPhase::Failed, WorkflowError::SearchFailed(message));
            }
        };
        let has_results = outcome.has_results;
        report.result = Some(outcome.data);

        if !has_results {
            tracing::info!(user = %user, "search.done.no_results");
            return report.done();
        }

        report.enter(SearchPhase::Crediting);
        match self.ledger.deduct(user, self.credit_cost).await {
            Ok(()) => {
                report.credit = CreditStatus::Deducted;
                tracing::info!(user = %user, cost = self.credit_cost, "credit.deducted");
            }
            Err(CreditError::PermissionDenied(reason)) => {
                report.credit = CreditStatus::SuppressedPermissionDenied;
                tracing::warn!(user = %user, reason = %reason, "credit.skipped.permission_denied");
            }
            Err(err) => {
                tracing::error!(user = %user, error = %err, "credit.failed");
                return report.stop(
                    SearchPhase::Failed,
                    WorkflowError::CreditDeductionFailed(err.to_string()),
                );
            }
        }

        report.done()
    }
}
