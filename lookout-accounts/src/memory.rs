//! In-process account store, used for local runs and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::{AccountError, CreditError, CreditLedger, Profile, ProfileStore, UserId};

#[derive(Debug, Default)]
pub struct MemoryAccounts {
    profiles: RwLock<HashMap<UserId, Profile>>,
    deny_writes: AtomicBool,
}

impl MemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(mut self, user: impl Into<UserId>, profile: Profile) -> Self {
        self.profiles.get_mut().insert(user.into(), profile);
        self
    }

    /// Reject every deduction with [`CreditError::PermissionDenied`].
    pub fn with_denied_writes(self, deny: bool) -> Self {
        self.deny_writes.store(deny, Ordering::Relaxed);
        self
    }

    pub fn set_denied_writes(&self, deny: bool) {
        self.deny_writes.store(deny, Ordering::Relaxed);
    }

    pub async fn snapshot(&self, user: &UserId) -> Option<Profile> {
        self.profiles.read().await.get(user).cloned()
    }
}

#[async_trait]
impl ProfileStore for MemoryAccounts {
    async fn load_profile(&self, user: &UserId) -> Result<Option<Profile>, AccountError> {
        Ok(self.snapshot(user).await)
    }
}

#[async_trait]
impl CreditLedger for MemoryAccounts {
    async fn deduct(&self, user: &UserId, amount: u32) -> Result<(), CreditError> {
        if self.deny_writes.load(Ordering::Relaxed) {
            return Err(CreditError::PermissionDenied(format!(
                "writes for {user} are not allowed"
            )));
        }
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(user)
            .ok_or_else(|| CreditError::NotFound(user.clone()))?;
        let used = profile.searches_used.unwrap_or(0.0) + f64::from(amount);
        profile.searches_used = Some(used);
        tracing::debug!(user = %user, amount, used, "accounts.memory.deducted");
        Ok(())
    }
}
