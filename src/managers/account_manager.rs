//! Account Manager for SkillPortal.
//!
//! Stands in for the authentication collaborator: tracks which account is
//! signed in and caches its profile in the local store.

use tracing::info;

use crate::services::local_store::{LocalStore, LocalStoreTrait};
use crate::types::account::{AccountProfile, PROFILE_KEY};

/// Source of the current account id. All persisted state is keyed by it.
pub trait AccountProvider {
    fn current_account_id(&self) -> Option<String>;
}

/// In-process session holder backed by the local store.
pub struct AccountManager {
    store: LocalStore,
    current: Option<AccountProfile>,
}

impl AccountManager {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Signs `profile` in, caching it locally.
    pub fn login(&mut self, profile: AccountProfile) {
        self.store
            .write_as(&profile.account_id, PROFILE_KEY, &profile);
        info!(account = %profile.account_id, "account signed in");
        self.current = Some(profile);
    }

    /// Signs the current account out. The cached profile and bookmarks stay on disk.
    pub fn logout(&mut self) -> Option<AccountProfile> {
        let previous = self.current.take();
        if let Some(profile) = &previous {
            info!(account = %profile.account_id, "account signed out");
        }
        previous
    }

    pub fn current_profile(&self) -> Option<&AccountProfile> {
        self.current.as_ref()
    }

    /// Profile cached for `account_id` by an earlier login.
    pub fn cached_profile(&self, account_id: &str) -> Option<AccountProfile> {
        self.store.read_as(account_id, PROFILE_KEY)
    }

    /// Drops the cached profile of `account_id`.
    pub fn forget_profile(&self, account_id: &str) {
        self.store.remove(account_id, PROFILE_KEY);
    }
}

impl AccountProvider for AccountManager {
    fn current_account_id(&self) -> Option<String> {
        self.current.as_ref().map(|p| p.account_id.clone())
    }
}
