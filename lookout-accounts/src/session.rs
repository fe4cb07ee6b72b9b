use async_trait::async_trait;

use crate::{Session, SessionProvider, UserId};

/// Identity fixed at startup, e.g. from configuration or a CLI flag.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<UserId>,
}

impl StaticSession {
    pub fn signed_in(user: impl Into<UserId>) -> Self {
        Self {
            user: Some(user.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// Blank ids count as signed out.
    pub fn from_option(user: Option<String>) -> Self {
        match user.filter(|id| !id.trim().is_empty()) {
            Some(id) => Self::signed_in(id.trim()),
            None => Self::anonymous(),
        }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn authenticate(&self) -> Option<Session> {
        self.user.clone().map(|user_id| Session { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_user_is_anonymous() {
        let session = StaticSession::from_option(Some("   ".into()));
        assert!(session.authenticate().await.is_none());
    }

    #[tokio::test]
    async fn signed_in_user_is_trimmed() {
        let session = StaticSession::from_option(Some(" u-1 ".into()));
        let got = session.authenticate().await.unwrap();
        assert_eq!(got.user_id, UserId::new("u-1"));
    }
}
