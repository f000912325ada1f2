//! Bookmark Sync Engine for SkillPortal.
//!
//! Owns the authoritative bookmark set of the current account. Every toggle
//! is applied to memory and the local store before anything touches the
//! network; the remote push then runs on the async runtime and reports back
//! through the [`StatusSignal`].
//!
//! Pushes always carry the full set as it is when the push starts and go
//! through a FIFO write lane, so the last set sent is always the latest one.
//! A push whose revision was already covered by an earlier push is skipped.
//! Remote failures never roll back local state.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::managers::account_manager::AccountProvider;
use crate::managers::status_signal::{StatusSignal, Subscription};
use crate::services::local_store::LocalStore;
use crate::services::remote_store::RemoteStore;
use crate::types::account::{storage_namespace, GUEST_ACCOUNT};
use crate::types::bookmark::{BookmarkSet, BOOKMARKS_KEY};
use crate::types::errors::RemoteError;
use crate::types::sync_status::SyncStatus;

/// Trait defining the bookmark sync interface consumed by UI surfaces.
pub trait BookmarkSyncTrait {
    fn is_bookmarked(&self, id: &str) -> bool;
    fn toggle_bookmark(&mut self, id: &str) -> ToggleReceipt;
    fn retry_sync(&mut self) -> Option<SyncHandle>;
    fn get_sync_status(&self) -> SyncStatus;
    fn subscribe_sync_status(
        &self,
        listener: Box<dyn Fn(&SyncStatus) + Send + Sync>,
    ) -> Subscription;
    fn switch_account(&mut self, account_id: Option<&str>) -> bool;
}

/// Tunables for remote pushes.
#[derive(Debug, Clone, Default)]
pub struct SyncEngineConfig {
    /// Forces a push into `error` after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// How a scheduled push ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The remote store accepted the set.
    Pushed,
    /// The remote store failed; status carries the message.
    Failed(RemoteError),
    /// An earlier push already carried this revision.
    Coalesced,
    /// The account changed before the push ran.
    Superseded,
}

/// Handle to a scheduled push. Safe to drop; the push continues.
pub struct SyncHandle {
    task: JoinHandle<SyncOutcome>,
}

impl SyncHandle {
    /// Waits for the push to finish.
    pub async fn settled(self) -> SyncOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "bookmark push task ended abnormally");
                SyncOutcome::Failed(RemoteError::Aborted)
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Result of a toggle, available synchronously.
pub struct ToggleReceipt {
    pub id: String,
    /// Membership after the toggle.
    pub bookmarked: bool,
    pub revision: u64,
    /// The remote push, absent when no account is signed in.
    pub sync: Option<SyncHandle>,
}

struct SyncState {
    /// `None` while signed out.
    account_id: Option<String>,
    set: BookmarkSet,
    /// Bumped on every local mutation and explicit retry.
    revision: u64,
    /// Highest revision a push has been attempted for in this epoch.
    attempted_revision: u64,
    /// Bumped on account switch; pushes from an older epoch are dropped.
    epoch: u64,
}

struct SyncShared {
    state: Mutex<SyncState>,
    signal: StatusSignal,
    remote: Arc<dyn RemoteStore>,
    lane: tokio::sync::Mutex<()>,
    timeout: Option<Duration>,
}

impl SyncShared {
    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Optimistic, locally durable bookmark set with background remote sync.
pub struct BookmarkSyncEngine {
    store: LocalStore,
    shared: Arc<SyncShared>,
    runtime: Handle,
}

impl BookmarkSyncEngine {
    /// Creates an engine for a signed-out visitor, loading the guest set.
    pub fn new(
        store: LocalStore,
        remote: Arc<dyn RemoteStore>,
        runtime: Handle,
        config: SyncEngineConfig,
    ) -> Self {
        let set = Self::load_set(&store, GUEST_ACCOUNT);
        Self {
            store,
            shared: Arc::new(SyncShared {
                state: Mutex::new(SyncState {
                    account_id: None,
                    set,
                    revision: 0,
                    attempted_revision: 0,
                    epoch: 0,
                }),
                signal: StatusSignal::new(),
                remote,
                lane: tokio::sync::Mutex::new(()),
                timeout: config.timeout,
            }),
            runtime,
        }
    }

    fn load_set(store: &LocalStore, storage_account: &str) -> BookmarkSet {
        store
            .read_as::<BookmarkSet>(storage_account, BOOKMARKS_KEY)
            .unwrap_or_default()
    }

    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    /// The signed-in account, if any.
    pub fn account_id(&self) -> Option<String> {
        self.shared.lock().account_id.clone()
    }

    /// Sorted snapshot of the current set.
    pub fn bookmarked_ids(&self) -> Vec<String> {
        self.shared.lock().set.to_sorted_vec()
    }

    pub fn bookmark_count(&self) -> usize {
        self.shared.lock().set.len()
    }

    /// The status signal, for hosts that want to share it.
    pub fn status_signal(&self) -> &StatusSignal {
        &self.shared.signal
    }

    /// Follows the account reported by `provider`. Returns whether it changed.
    pub fn follow_account(&mut self, provider: &dyn AccountProvider) -> bool {
        let current = provider.current_account_id();
        self.switch_account(current.as_deref())
    }

    /// Spawns the push. The caller has already moved the status to syncing.
    fn schedule_push(&self, account_id: String, revision: u64, epoch: u64) -> SyncHandle {
        self.shared.signal.publish();
        let shared = self.shared.clone();
        let task = self
            .runtime
            .spawn(async move { push(shared, account_id, revision, epoch).await });
        SyncHandle { task }
    }
}

async fn push(shared: Arc<SyncShared>, account_id: String, revision: u64, epoch: u64) -> SyncOutcome {
    let _lane = shared.lane.lock().await;

    let (ids, sending_revision) = {
        let mut state = shared.lock();
        if state.epoch != epoch {
            return SyncOutcome::Superseded;
        }
        if state.attempted_revision >= revision {
            return SyncOutcome::Coalesced;
        }
        state.attempted_revision = state.revision;
        (state.set.to_sorted_vec(), state.revision)
    };

    debug!(account_id = %account_id, revision = sending_revision, count = ids.len(), "pushing bookmarks");
    let request = shared.remote.put_bookmarks(&account_id, &ids);
    let result = match shared.timeout {
        Some(limit) => match tokio::time::timeout(limit, request).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout(limit.as_millis() as u64)),
        },
        None => request.await,
    };

    if let Err(err) = &result {
        warn!(account_id = %account_id, revision = sending_revision, error = %err, "bookmark sync failed");
    }

    // Epoch and revision are checked and the status changed under one lock.
    let (outcome, resolved) = {
        let state = shared.lock();
        if state.epoch != epoch {
            return SyncOutcome::Superseded;
        }
        let is_latest = state.revision == sending_revision;
        let outcome = match result {
            Ok(()) => {
                if is_latest {
                    let at = BookmarkSyncEngine::now_millis();
                    shared.signal.transition(|status| status.succeed(at));
                }
                SyncOutcome::Pushed
            }
            Err(err) => {
                if is_latest {
                    let message = err.to_string();
                    shared.signal.transition(|status| status.fail(message));
                }
                SyncOutcome::Failed(err)
            }
        };
        (outcome, is_latest)
    };
    if resolved {
        shared.signal.publish();
    }
    outcome
}

impl BookmarkSyncTrait for BookmarkSyncEngine {
    /// Membership test against the in-memory set. Unknown ids are simply absent.
    fn is_bookmarked(&self, id: &str) -> bool {
        self.shared.lock().set.contains(id)
    }

    /// Flips `id` locally, persists, then schedules a push of the full set.
    fn toggle_bookmark(&mut self, id: &str) -> ToggleReceipt {
        let (bookmarked, ids, account_id, revision, epoch) = {
            let mut state = self.shared.lock();
            let bookmarked = state.set.toggle(id);
            state.revision += 1;
            if state.account_id.is_some() {
                self.shared.signal.transition(|status| status.begin());
            }
            (
                bookmarked,
                state.set.to_sorted_vec(),
                state.account_id.clone(),
                state.revision,
                state.epoch,
            )
        };

        self.store
            .write_as(storage_namespace(account_id.as_deref()), BOOKMARKS_KEY, &ids);
        debug!(id, bookmarked, revision, account = ?account_id, "bookmark toggled");

        let sync = account_id.map(|account| self.schedule_push(account, revision, epoch));
        ToggleReceipt {
            id: id.to_string(),
            bookmarked,
            revision,
            sync,
        }
    }

    /// Pushes the current set again without changing it.
    fn retry_sync(&mut self) -> Option<SyncHandle> {
        let (account_id, revision, epoch) = {
            let mut state = self.shared.lock();
            let account_id = state.account_id.clone()?;
            state.revision += 1;
            self.shared.signal.transition(|status| status.begin());
            (account_id, state.revision, state.epoch)
        };
        Some(self.schedule_push(account_id, revision, epoch))
    }

    fn get_sync_status(&self) -> SyncStatus {
        self.shared.signal.get()
    }

    fn subscribe_sync_status(
        &self,
        listener: Box<dyn Fn(&SyncStatus) + Send + Sync>,
    ) -> Subscription {
        self.shared.signal.subscribe(listener)
    }

    /// Reloads the set for `account_id` (or the guest set for `None`).
    ///
    /// An empty id counts as signed out. Pending pushes for the previous
    /// account are dropped and the status returns to idle. Returns `false`
    /// when the account is unchanged.
    fn switch_account(&mut self, account_id: Option<&str>) -> bool {
        let account_id = account_id.filter(|id| !id.is_empty());
        if self.shared.lock().account_id.as_deref() == account_id {
            return false;
        }

        let set = Self::load_set(&self.store, storage_namespace(account_id));
        {
            let mut state = self.shared.lock();
            state.account_id = account_id.map(str::to_string);
            state.set = set;
            state.epoch += 1;
            state.attempted_revision = state.revision;
            self.shared.signal.transition(|status| *status = SyncStatus::idle());
        }
        info!(account = ?account_id, "bookmark account switched");
        self.shared.signal.publish();
        true
    }
}
