use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Local store key under which an account's bookmark ids are persisted.
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// The set of catalog item ids an account has bookmarked.
///
/// Persisted and pushed remotely as a plain JSON array of strings, sorted so
/// that equal sets always produce identical payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct BookmarkSet {
    ids: HashSet<String>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flips membership of `id`. Returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.ids.iter()
    }

    /// Sorted copy of the ids, the shape used on disk and on the wire.
    pub fn to_sorted_vec(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl From<Vec<String>> for BookmarkSet {
    fn from(ids: Vec<String>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }
}

impl From<BookmarkSet> for Vec<String> {
    fn from(set: BookmarkSet) -> Self {
        set.to_sorted_vec()
    }
}

impl FromIterator<String> for BookmarkSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
