use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::facet::WILDCARD_TAG;

/// What kind of card an item renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    LearningCard,
    Certification,
    Project,
    ScreeningQuestion,
}

/// One independently rendered content card.
///
/// `role_tags` always contains the wildcard tag, whether the item was built
/// in code or deserialized from a catalog payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCatalogItem")]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub kind: ItemKind,
    pub role_tags: BTreeSet<String>,
    /// Rendered content; opaque to the engines.
    #[serde(default)]
    pub content: serde_json::Value,
}

#[derive(Deserialize)]
struct RawCatalogItem {
    id: String,
    title: String,
    kind: ItemKind,
    #[serde(default)]
    role_tags: BTreeSet<String>,
    #[serde(default)]
    content: serde_json::Value,
}

impl From<RawCatalogItem> for CatalogItem {
    fn from(raw: RawCatalogItem) -> Self {
        let mut item = CatalogItem::new(&raw.id, &raw.title, raw.kind, raw.role_tags);
        item.content = raw.content;
        item
    }
}

impl CatalogItem {
    pub fn new<I, S>(id: &str, title: &str, kind: ItemKind, role_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tags = BTreeSet::new();
        for tag in role_tags {
            let tag: String = tag.into();
            let tag = tag.trim();
            if !tag.is_empty() {
                tags.insert(tag.to_string());
            }
        }
        tags.insert(WILDCARD_TAG.to_string());
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            role_tags: tags,
            content: serde_json::Value::Null,
        }
    }

    /// Space-separated tag list, the form written to a card's role attribute.
    pub fn role_attribute(&self) -> String {
        self.role_tags
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of resolving a bookmarked id against the loaded catalog.
///
/// Bookmarks reference items by value, so an id may point at an item that is
/// not loaded yet or no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub enum BookmarkLookup<'a> {
    Found(&'a CatalogItem),
    NotFound(String),
}

impl<'a> BookmarkLookup<'a> {
    pub fn id(&self) -> &str {
        match self {
            BookmarkLookup::Found(item) => &item.id,
            BookmarkLookup::NotFound(id) => id,
        }
    }

    /// Title to render, with a generic placeholder for unresolved ids.
    pub fn display_title(&self) -> &str {
        match self {
            BookmarkLookup::Found(item) => &item.title,
            BookmarkLookup::NotFound(_) => "Saved item (unavailable)",
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, BookmarkLookup::Found(_))
    }
}
