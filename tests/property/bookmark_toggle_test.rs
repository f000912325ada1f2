//! Property-based tests for optimistic bookmark toggling.
//!
//! Pushes are spawned onto a current-thread runtime that is never driven, so
//! these exercise the synchronous half of the engine only: membership,
//! revisions, local persistence and the "syncing" status.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;
use tokio::runtime::{Builder, Runtime};

use skillportal::database::Database;
use skillportal::managers::bookmark_sync::{BookmarkSyncEngine, BookmarkSyncTrait, SyncEngineConfig};
use skillportal::services::local_store::LocalStore;
use skillportal::services::remote_store::MemoryRemoteStore;
use skillportal::types::account::storage_namespace;
use skillportal::types::bookmark::{BookmarkSet, BOOKMARKS_KEY};

fn idle_runtime() -> Runtime {
    Builder::new_current_thread().build().unwrap()
}

fn arb_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            Just("learning-ba".to_string()),
            Just("learning-da".to_string()),
            Just("cert-aws".to_string()),
            "[a-z]{1,6}-[0-9]{1,2}",
        ],
        0..40,
    )
}

proptest! {
    /// Membership after a toggle sequence equals the parity of toggles per id.
    #[test]
    fn membership_is_toggle_parity(ids in arb_ids(), account in prop::option::of("u-[a-z]{3,8}")) {
        let runtime = idle_runtime();
        let store = LocalStore::new(Arc::new(Database::open_in_memory().unwrap()));
        let remote = Arc::new(MemoryRemoteStore::new());
        let mut engine = BookmarkSyncEngine::new(
            store.clone(),
            remote,
            runtime.handle().clone(),
            SyncEngineConfig::default(),
        );
        engine.switch_account(account.as_deref());

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for (i, id) in ids.iter().enumerate() {
            let receipt = engine.toggle_bookmark(id);
            *counts.entry(id.as_str()).or_default() += 1;
            prop_assert_eq!(receipt.bookmarked, counts[id.as_str()] % 2 == 1);
            prop_assert_eq!(receipt.revision, i as u64 + 1);
            prop_assert_eq!(receipt.sync.is_some(), account.is_some());
        }

        for (id, count) in &counts {
            prop_assert_eq!(engine.is_bookmarked(id), count % 2 == 1);
        }

        let expected = counts.values().filter(|c| *c % 2 == 1).count();
        prop_assert_eq!(engine.bookmark_count(), expected);

        let persisted: BookmarkSet = store
            .read_as(storage_namespace(account.as_deref()), BOOKMARKS_KEY)
            .unwrap_or_default();
        prop_assert_eq!(persisted.to_sorted_vec(), engine.bookmarked_ids());

        let syncing = engine.get_sync_status().is_syncing;
        prop_assert_eq!(syncing, account.is_some() && !ids.is_empty());
    }

    /// Toggling the same id twice restores the previous set.
    #[test]
    fn double_toggle_is_identity(seed in arb_ids(), id in "[a-z]{1,8}") {
        let runtime = idle_runtime();
        let store = LocalStore::new(Arc::new(Database::open_in_memory().unwrap()));
        let mut engine = BookmarkSyncEngine::new(
            store,
            Arc::new(MemoryRemoteStore::new()),
            runtime.handle().clone(),
            SyncEngineConfig::default(),
        );
        for s in &seed {
            engine.toggle_bookmark(s);
        }
        let before = engine.bookmarked_ids();

        engine.toggle_bookmark(&id);
        engine.toggle_bookmark(&id);
        prop_assert_eq!(engine.bookmarked_ids(), before);
    }
}
