//! Remote bookmark store boundary.
//!
//! The backend is an account-scoped document store. The only call the sync
//! engine makes is a full-set overwrite, never a delta, so writes that land
//! out of order cannot resurrect an individual stale toggle.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::errors::RemoteError;

/// Account-scoped remote document store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Replaces the account's stored bookmark ids with `ids`.
    async fn put_bookmarks(&self, account_id: &str, ids: &[String]) -> Result<(), RemoteError>;
}

/// One write observed by [`MemoryRemoteStore`], successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteWrite {
    pub account_id: String,
    pub ids: Vec<String>,
    pub accepted: bool,
}

#[derive(Default)]
struct MemoryState {
    documents: HashMap<String, Vec<String>>,
    failure: Option<RemoteError>,
    writes: Vec<RemoteWrite>,
}

/// In-process document store.
///
/// Used when no backend URL is configured. Can be switched into a failing
/// mode to exercise the error path.
#[derive(Default)]
pub struct MemoryRemoteStore {
    state: Mutex<MemoryState>,
    latency: Option<Duration>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every write by `latency` before it is applied.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            latency: Some(latency),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes subsequent writes fail with `failure`; `None` restores normal operation.
    pub fn set_failure(&self, failure: Option<RemoteError>) {
        self.lock().failure = failure;
    }

    pub fn go_offline(&self) {
        self.set_failure(Some(RemoteError::Network("network down".to_string())));
    }

    pub fn go_online(&self) {
        self.set_failure(None);
    }

    /// The ids currently stored for an account.
    pub fn document(&self, account_id: &str) -> Option<Vec<String>> {
        self.lock().documents.get(account_id).cloned()
    }

    pub fn writes(&self) -> Vec<RemoteWrite> {
        self.lock().writes.clone()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn put_bookmarks(&self, account_id: &str, ids: &[String]) -> Result<(), RemoteError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.lock();
        let failure = state.failure.clone();
        state.writes.push(RemoteWrite {
            account_id: account_id.to_string(),
            ids: ids.to_vec(),
            accepted: failure.is_none(),
        });

        match failure {
            Some(err) => Err(err),
            None => {
                state.documents.insert(account_id.to_string(), ids.to_vec());
                Ok(())
            }
        }
    }
}

/// HTTP client for a JSON document backend.
///
/// Writes `PUT {base}/accounts/{account_id}/bookmarks` with body `{"ids": [...]}`.
#[cfg(feature = "network")]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

#[cfg(feature = "network")]
impl HttpRemoteStore {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| RemoteError::Rejected(format!("Invalid remote store URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::Rejected(format!(
                "Invalid remote store URL: {}",
                base_url
            )));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    fn bookmarks_url(&self, account_id: &str) -> Result<reqwest::Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Rejected("Invalid remote store URL".to_string()))?
            .pop_if_empty()
            .extend(["accounts", account_id, "bookmarks"]);
        Ok(url)
    }
}

#[cfg(feature = "network")]
#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn put_bookmarks(&self, account_id: &str, ids: &[String]) -> Result<(), RemoteError> {
        let url = self.bookmarks_url(account_id)?;
        let body = serde_json::to_vec(&serde_json::json!({ "ids": ids }))
            .map_err(|e| RemoteError::Rejected(e.to_string()))?;

        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RemoteError::Rejected(format!(
                "Remote store rejected write ({})",
                status
            )))
        }
    }
}
