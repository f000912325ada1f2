//! Property-based tests for bookmark persistence.
//!
//! A set written by one engine must be what a fresh engine on the same
//! database loads for that account, and nothing leaks into other accounts.

use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use tokio::runtime::Builder;

use skillportal::database::Database;
use skillportal::managers::bookmark_sync::{BookmarkSyncEngine, BookmarkSyncTrait, SyncEngineConfig};
use skillportal::services::local_store::LocalStore;
use skillportal::services::remote_store::MemoryRemoteStore;
use skillportal::types::bookmark::BookmarkSet;

proptest! {
    #[test]
    fn set_survives_engine_restart(
        ids in prop::collection::btree_set("[a-z0-9-]{1,12}", 0..25),
        account in "u-[a-z]{3,8}",
    ) {
        let runtime = Builder::new_current_thread().build().unwrap();
        let store = LocalStore::new(Arc::new(Database::open_in_memory().unwrap()));
        let remote = Arc::new(MemoryRemoteStore::new());

        let mut first = BookmarkSyncEngine::new(
            store.clone(),
            remote.clone(),
            runtime.handle().clone(),
            SyncEngineConfig::default(),
        );
        first.switch_account(Some(account.as_str()));
        for id in &ids {
            first.toggle_bookmark(id);
        }

        let mut second = BookmarkSyncEngine::new(
            store,
            remote,
            runtime.handle().clone(),
            SyncEngineConfig::default(),
        );
        prop_assert_eq!(second.bookmark_count(), 0, "guest set must stay empty");

        second.switch_account(Some(account.as_str()));
        let loaded: BTreeSet<String> = second.bookmarked_ids().into_iter().collect();
        prop_assert_eq!(loaded, ids);
    }

    #[test]
    fn bookmark_set_json_is_sorted_array(ids in prop::collection::vec("[a-z]{1,6}", 0..20)) {
        let set: BookmarkSet = ids.iter().cloned().collect();
        let json = serde_json::to_value(&set).unwrap();
        let array: Vec<String> = serde_json::from_value(json.clone()).unwrap();

        let expected: Vec<String> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(&array, &expected);

        let back: BookmarkSet = serde_json::from_value(json).unwrap();
        prop_assert_eq!(back, set);
    }
}
