use serde::{Deserialize, Serialize};

/// Coarse lifecycle phase of bookmark reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    Idle,
    Syncing,
    Synced,
    Error,
}

/// Snapshot of reconciliation state between local bookmarks and the remote store.
///
/// Never persisted; every session starts idle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_syncing: bool,
    pub error: Option<String>,
    /// Unix time in milliseconds of the last successful push.
    pub last_sync_time: Option<i64>,
}

impl SyncStatus {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SyncPhase {
        if self.is_syncing {
            SyncPhase::Syncing
        } else if self.error.is_some() {
            SyncPhase::Error
        } else if self.last_sync_time.is_some() {
            SyncPhase::Synced
        } else {
            SyncPhase::Idle
        }
    }

    /// Text for the sync badge; `None` while nothing has been attempted.
    pub fn badge_label(&self) -> Option<&'static str> {
        match self.phase() {
            SyncPhase::Idle => None,
            SyncPhase::Syncing => Some("Syncing…"),
            SyncPhase::Synced => Some("Synced"),
            SyncPhase::Error => Some("Sync failed"),
        }
    }

    pub(crate) fn begin(&mut self) {
        self.is_syncing = true;
        self.error = None;
    }

    pub(crate) fn succeed(&mut self, at_millis: i64) {
        self.is_syncing = false;
        self.error = None;
        self.last_sync_time = Some(at_millis);
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.is_syncing = false;
        self.error = Some(message);
    }
}
