//! Search backend seam.
//!
//! A backend takes one trimmed query and returns the raw, schema-less result
//! together with the `has_results` flag that decides whether a credit is
//! spent. The flag is computed here, never re-derived by the renderer.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub mod assess;
pub mod http;

pub use assess::has_results;
pub use http::HttpSearchBackend;

/// Raw backend result plus the credit signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub data: Value,
    pub has_results: bool,
}

impl SearchOutcome {
    /// Outcome whose flag is derived with [`has_results`].
    pub fn assessed(data: Value) -> Self {
        let has_results = has_results(&data);
        Self { data, has_results }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    /// The backend answered but refused the query.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Http(#[from] lookout_http::HttpError),
}

impl SearchError {
    /// Text shown to the user; the backend's own message where it sent one.
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Rejected(message) => message.clone(),
            SearchError::Http(err) => err.user_message(),
        }
    }
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError>;
}
