//! Content catalog.
//!
//! Items arrive asynchronously from a [`CatalogSource`], possibly after the
//! first render, and are replaced wholesale on refetch. Bookmarks are resolved
//! against whatever is loaded at the time.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::types::catalog::{BookmarkLookup, CatalogItem};
use crate::types::errors::CatalogError;
use crate::types::facet::FilterFacet;

/// Asynchronous provider of catalog items.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load_items(&self) -> Result<Vec<CatalogItem>, CatalogError>;
}

/// Reads a JSON array of items from a file.
pub struct JsonFileCatalogSource {
    path: PathBuf,
}

impl JsonFileCatalogSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalogSource {
    async fn load_items(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| CatalogError::IoError(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_slice(&bytes).map_err(|e| CatalogError::ParseError(e.to_string()))
    }
}

/// Loaded items indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    index: HashMap<String, usize>,
    /// Item ids last rendered into each named section.
    sections: HashMap<String, Vec<String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the loaded items. Later duplicates of an id are dropped.
    pub fn replace(&mut self, items: Vec<CatalogItem>) {
        self.items.clear();
        self.index.clear();
        self.sections.clear();
        for item in items {
            if self.index.contains_key(&item.id) {
                continue;
            }
            self.index.insert(item.id.clone(), self.items.len());
            self.items.push(item);
        }
    }

    /// Adds items, replacing any already loaded under the same id.
    pub fn extend(&mut self, items: Vec<CatalogItem>) {
        for item in items {
            match self.index.get(&item.id) {
                Some(&i) => self.items[i] = item,
                None => {
                    self.index.insert(item.id.clone(), self.items.len());
                    self.items.push(item);
                }
            }
        }
    }

    /// Replaces the items of one section, as a refetch of that section does.
    ///
    /// Items the section no longer lists are dropped unless another section
    /// still lists them.
    pub fn replace_section(&mut self, section: &str, items: Vec<CatalogItem>) {
        let ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
        let previous = self.sections.insert(section.to_string(), ids).unwrap_or_default();
        let listed: HashSet<&str> = self
            .sections
            .values()
            .flat_map(|ids| ids.iter().map(String::as_str))
            .collect();
        let dropped: HashSet<String> = previous
            .into_iter()
            .filter(|id| !listed.contains(id.as_str()))
            .collect();

        if !dropped.is_empty() {
            self.items.retain(|item| !dropped.contains(&item.id));
            self.index = self
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| (item.id.clone(), i))
                .collect();
            debug!(section, dropped = dropped.len(), "catalog section shrank");
        }
        self.extend(items);
    }

    /// Loads from `source` and replaces the current items on success.
    /// On failure the previous items stay in place.
    pub async fn refresh(&mut self, source: &dyn CatalogSource) -> Result<usize, CatalogError> {
        let items = source.load_items().await?;
        self.replace(items);
        info!(count = self.items.len(), "catalog loaded");
        Ok(self.items.len())
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    /// Resolves one bookmarked id.
    pub fn resolve(&self, id: &str) -> BookmarkLookup<'_> {
        match self.get(id) {
            Some(item) => BookmarkLookup::Found(item),
            None => BookmarkLookup::NotFound(id.to_string()),
        }
    }

    pub fn resolve_all<'a, I>(&'a self, ids: I) -> Vec<BookmarkLookup<'a>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        ids.into_iter().map(|id| self.resolve(id.as_ref())).collect()
    }

    /// Items in a facet, using the same rule as the card filter.
    pub fn items_for(&self, facet: FilterFacet) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| crate::services::filter_engine::card_matches(facet, &item.role_attribute()))
            .collect()
    }
}
