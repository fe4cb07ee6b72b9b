//! User identity, quota accounting and the credit store.
//!
//! The search workflow never reads ambient session state. Callers resolve a
//! [`Session`] through a [`SessionProvider`], load the [`Profile`] through a
//! [`ProfileStore`] and hand both to the workflow, which spends credits
//! through a [`CreditLedger`].
//!
//! ```
//! use lookout_accounts::{Profile, QuotaGate, compute_remaining};
//!
//! let profile = Profile::new(10.0, 4.0);
//! let remaining = compute_remaining(Some(&profile));
//! assert_eq!(remaining, 6.0);
//! assert!(QuotaGate::check(remaining).is_ok());
//! assert!(QuotaGate::check(compute_remaining(None)).is_err());
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

pub mod http;
pub mod memory;
pub mod quota;
pub mod session;

pub use http::HttpAccounts;
pub use memory::MemoryAccounts;
pub use quota::{QuotaDenied, QuotaGate, compute_remaining};
pub use session::StaticSession;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: UserId,
}

/// Account record as stored by the profile store.
///
/// Only the two counters are interpreted; everything else is carried along.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searches_allotted: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searches_used: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    pub fn new(allotted: f64, used: f64) -> Self {
        Self {
            searches_allotted: Some(allotted),
            searches_used: Some(used),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("profile store error: {0}")]
    Store(String),
    #[error(transparent)]
    Http(#[from] lookout_http::HttpError),
}

/// Failure to spend credits.
///
/// `PermissionDenied` is kept apart from every other cause so callers can
/// match on it instead of inspecting messages.
#[derive(Debug, Error)]
pub enum CreditError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("no account for user {0}")]
    NotFound(UserId),
    #[error("credit store error: {0}")]
    Store(String),
}

impl CreditError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, CreditError::PermissionDenied(_))
    }
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The current user, if anyone is signed in.
    async fn authenticate(&self) -> Option<Session>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when the user has no profile yet.
    async fn load_profile(&self, user: &UserId) -> Result<Option<Profile>, AccountError>;
}

#[async_trait]
pub trait CreditLedger: Send + Sync {
    async fn deduct(&self, user: &UserId, amount: u32) -> Result<(), CreditError>;
}
