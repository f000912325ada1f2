//! App Core for SkillPortal.
//!
//! Central struct wiring the engines together for one host window: accounts,
//! the bookmark sync engine, the loaded catalog and the card view with its
//! filter and reveal scheduler. Constructed once at startup and passed to
//! whoever needs it.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::warn;

use crate::database::connection::Database;
use crate::managers::account_manager::AccountManager;
use crate::managers::bookmark_sync::{BookmarkSyncEngine, BookmarkSyncTrait};
use crate::services::catalog::Catalog;
use crate::services::filter_engine::{FilterEngine, FilterOutcome};
use crate::services::local_store::LocalStore;
use crate::services::remote_store::{MemoryRemoteStore, RemoteStore};
use crate::services::reveal_scheduler::RevealScheduler;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::account::AccountProfile;
use crate::types::catalog::{BookmarkLookup, CatalogItem};
use crate::types::facet::FilterFacet;
use crate::types::settings::PortalSettings;
use crate::view::{CardTree, NodeId, Rect};

/// Central application struct holding all engines.
pub struct App {
    pub db: Arc<Database>,
    pub settings_engine: SettingsEngine,
    pub accounts: AccountManager,
    pub bookmarks: BookmarkSyncEngine,
    pub catalog: Catalog,
    pub view: CardTree,
    pub filter: FilterEngine,
    pub reveal: RevealScheduler,
}

/// Picks the remote store named by the settings, falling back to the in-process one.
pub fn remote_store_from_settings(settings: &PortalSettings) -> Arc<dyn RemoteStore> {
    match settings.sync.remote_url.as_deref().and_then(http_remote) {
        Some(remote) => remote,
        None => Arc::new(MemoryRemoteStore::new()),
    }
}

#[cfg(feature = "network")]
fn http_remote(url: &str) -> Option<Arc<dyn RemoteStore>> {
    match crate::services::remote_store::HttpRemoteStore::new(url) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            warn!(url, error = %e, "unusable remote store URL, keeping bookmarks in-process");
            None
        }
    }
}

#[cfg(not(feature = "network"))]
fn http_remote(url: &str) -> Option<Arc<dyn RemoteStore>> {
    warn!(url, "built without network support, keeping bookmarks in-process");
    None
}

impl App {
    /// Opens the database and loads settings, using the remote store they name.
    pub fn new(
        db_path: &str,
        settings_path: Option<String>,
        runtime: Handle,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        if let Err(e) = settings_engine.load() {
            warn!(error = %e, "settings unreadable, using defaults");
        }
        let remote = remote_store_from_settings(settings_engine.get_settings());
        Self::with_remote(db_path, settings_engine, remote, runtime)
    }

    /// Builds the app around an explicit remote store.
    pub fn with_remote(
        db_path: &str,
        settings_engine: SettingsEngine,
        remote: Arc<dyn RemoteStore>,
        runtime: Handle,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        let store = LocalStore::new(db.clone());

        let bookmarks = BookmarkSyncEngine::new(
            store.clone(),
            remote,
            runtime,
            settings_engine.sync_engine_config(),
        );
        let filter = FilterEngine::new(settings_engine.show_delay());
        let mut reveal = RevealScheduler::new(settings_engine.reveal_config());
        let view = CardTree::new();
        reveal.attach(&view);

        Ok(Self {
            db,
            accounts: AccountManager::new(store),
            bookmarks,
            catalog: Catalog::new(),
            view,
            filter,
            reveal,
            settings_engine,
        })
    }

    /// Signs in and switches the bookmark set to the new account.
    pub fn login(&mut self, profile: AccountProfile) {
        self.accounts.login(profile);
        self.bookmarks.follow_account(&self.accounts);
    }

    /// Signs out; bookmarks fall back to the guest set.
    pub fn logout(&mut self) -> Option<AccountProfile> {
        let previous = self.accounts.logout();
        self.bookmarks.follow_account(&self.accounts);
        previous
    }

    /// Renders `items` as the cards of section `name`, creating it if needed.
    ///
    /// New cards get the active facet applied and are handed to the reveal
    /// scheduler, as a late catalog response would be.
    pub fn render_section(&mut self, name: &str, filterable: bool, items: Vec<CatalogItem>) -> Vec<NodeId> {
        let section = match self.view.section_by_name(name) {
            Some(section) => section,
            None => self.view.add_section(name, filterable),
        };
        let nodes = self.view.render_items(section, &items);
        self.catalog.replace_section(name, items);

        let facet = self.filter.active_facet();
        self.filter.apply_filter_now(&mut self.view, facet);
        self.pump_mutations();
        nodes
    }

    /// Forwards pending view mutations to the reveal scheduler.
    pub fn pump_mutations(&mut self) -> Vec<NodeId> {
        let mutations = self.view.take_mutations();
        self.reveal.handle_mutations(&self.view, &mutations)
    }

    /// Applies `facet`. Cards it un-hides become reveal candidates again.
    pub fn apply_filter(&mut self, facet: FilterFacet) -> FilterOutcome {
        let outcome = self.filter.apply_filter(&mut self.view, facet);
        self.reveal.rescan(&self.view);
        outcome
    }

    pub fn commit_filter(&mut self, generation: u64) -> usize {
        self.filter.commit_shows(&mut self.view, generation)
    }

    /// Reveals cards near `viewport`; returns their item ids.
    pub fn on_viewport(&mut self, viewport: Rect) -> Vec<String> {
        self.reveal
            .on_viewport(&mut self.view, viewport)
            .into_iter()
            .filter_map(|node| self.view.card(node).map(|c| c.item_id.clone()))
            .collect()
    }

    /// Current bookmarks resolved against the loaded catalog.
    pub fn resolved_bookmarks(&self) -> Vec<BookmarkLookup<'_>> {
        self.catalog.resolve_all(self.bookmarks.bookmarked_ids())
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.bookmarks.is_bookmarked(id)
    }

    /// Tears the view down; the reveal scheduler stops watching.
    pub fn shutdown(&mut self) {
        self.reveal.dispose();
    }
}
