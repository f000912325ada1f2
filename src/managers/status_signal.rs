//! Observable sync status.
//!
//! Holds the current [`SyncStatus`] and fans every transition out to any
//! number of listeners. Listeners run on whichever thread applied the
//! transition, after the status lock is released, so they may read the signal.
//! Deliveries are serialized and always carry the status current at delivery
//! time, so the last value a listener sees is the settled one. Listeners must
//! not change the status themselves.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::types::sync_status::SyncStatus;

type Listener = Arc<dyn Fn(&SyncStatus) + Send + Sync>;

struct SignalInner {
    status: Mutex<SyncStatus>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    delivery: Mutex<()>,
    next_id: AtomicU64,
}

/// Shared handle to the status value and its listeners. Cloning shares state.
#[derive(Clone)]
pub struct StatusSignal {
    inner: Arc<SignalInner>,
}

impl StatusSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalInner {
                status: Mutex::new(SyncStatus::idle()),
                listeners: Mutex::new(Vec::new()),
                delivery: Mutex::new(()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    fn status(&self) -> MutexGuard<'_, SyncStatus> {
        self.inner.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of the current status.
    pub fn get(&self) -> SyncStatus {
        self.status().clone()
    }

    /// Applies `change` and notifies every listener.
    pub fn update<F: FnOnce(&mut SyncStatus)>(&self, change: F) -> SyncStatus {
        let snapshot = self.transition(change);
        self.publish();
        snapshot
    }

    /// Replaces the status without going through a transition closure.
    pub fn reset(&self, status: SyncStatus) {
        self.update(|current| *current = status);
    }

    /// Applies `change` without notifying. Pair with [`StatusSignal::publish`]
    /// once any lock guarding the caller's own state is released.
    pub fn transition<F: FnOnce(&mut SyncStatus)>(&self, change: F) -> SyncStatus {
        let mut status = self.status();
        change(&mut status);
        status.clone()
    }

    /// Delivers the current status to every listener.
    pub fn publish(&self) {
        let _delivery = self
            .inner
            .delivery
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let status = self.get();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&status);
        }
    }

    /// Registers a listener for every future transition.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SyncStatus) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(listener)));
        Subscription {
            id: Some(id),
            signal: Arc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl Default for StatusSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Disposer for one listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: Option<u64>,
    signal: Weak<SignalInner>,
}

impl Subscription {
    /// Removes this listener; other listeners are untouched.
    pub fn unsubscribe(mut self) {
        self.remove();
    }

    /// Keeps the listener registered for the lifetime of the signal.
    pub fn detach(mut self) {
        self.id = None;
    }

    pub fn is_active(&self) -> bool {
        match (self.id, self.signal.upgrade()) {
            (Some(id), Some(inner)) => inner
                .listeners
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .iter()
                .any(|(lid, _)| *lid == id),
            _ => false,
        }
    }

    fn remove(&mut self) {
        if let (Some(id), Some(inner)) = (self.id.take(), self.signal.upgrade()) {
            inner
                .listeners
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .retain(|(lid, _)| *lid != id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.remove();
    }
}
