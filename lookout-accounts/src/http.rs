//! REST-backed profile and credit store.
//!
//! - `GET  profiles/{uid}` returns the profile document (404: no profile)
//! - `POST profiles/{uid}/consume` with `{"amount": n}` spends credits
//!
//! Deductions are sent once; a retried POST could spend twice.

use async_trait::async_trait;
use lookout_http::{Auth, HttpClient, HttpError, RequestOpts, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::{AccountError, CreditError, CreditLedger, Profile, ProfileStore, UserId};

#[derive(Clone)]
pub struct HttpAccounts {
    http: HttpClient,
    token: Option<String>,
}

#[derive(Serialize)]
struct ConsumeRequest {
    amount: u32,
}

impl HttpAccounts {
    pub fn new(
        endpoint: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let http = HttpClient::new(endpoint)?.with_timeout(timeout);
        Ok(Self {
            http,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    fn opts(&self, retries: Option<usize>) -> RequestOpts<'_> {
        RequestOpts {
            auth: self.token.as_deref().map(Auth::Bearer),
            retries,
            ..Default::default()
        }
    }
}

/// `profiles/{uid}` with the id percent-encoded as one path segment.
///
/// `None` for ids that cannot name a segment (`""`, `.` and `..` would be
/// collapsed by URL resolution and address another resource).
fn profile_path(user: &UserId) -> Option<String> {
    let id = user.as_str();
    if matches!(id, "" | "." | "..") {
        return None;
    }
    let mut scratch = Url::parse("http://accounts.invalid/profiles").ok()?;
    scratch.path_segments_mut().ok()?.push(id);
    Some(scratch.path().trim_start_matches('/').to_string())
}

#[async_trait]
impl ProfileStore for HttpAccounts {
    async fn load_profile(&self, user: &UserId) -> Result<Option<Profile>, AccountError> {
        let Some(path) = profile_path(user) else {
            tracing::warn!(user = %user, "accounts.http.unaddressable_user");
            return Ok(None);
        };
        match self
            .http
            .get_json::<Profile>(&path, self.opts(None))
            .await
        {
            Ok(profile) => Ok(Some(profile)),
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl CreditLedger for HttpAccounts {
    async fn deduct(&self, user: &UserId, amount: u32) -> Result<(), CreditError> {
        let Some(path) = profile_path(user) else {
            tracing::warn!(user = %user, "accounts.http.unaddressable_user");
            return Err(CreditError::NotFound(user.clone()));
        };
        let path = format!("{path}/consume");
        self.http
            .post_json::<_, Value>(&path, &ConsumeRequest { amount }, self.opts(Some(0)))
            .await
            .map(|_| ())
            .map_err(|err| match err.status() {
                Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                    CreditError::PermissionDenied(err.user_message())
                }
                Some(StatusCode::NOT_FOUND) => CreditError::NotFound(user.clone()),
                _ => CreditError::Store(err.to_string()),
            })
    }
}
