//! Imperative view seam.
//!
//! The filter engine and reveal scheduler never re-render cards; they flip
//! markers on already-rendered nodes through [`ViewAdapter`]. [`CardTree`] is
//! the in-process implementation, a small synthetic DOM with grid layout.

pub mod card_tree;
pub mod geometry;

use serde::{Deserialize, Serialize};

pub use card_tree::{CardNode, CardTree, GridLayout, Mutation, NodeId, SectionId};
pub use geometry::Rect;

/// Presentation markers a card can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// Excluded by the active filter; takes precedence over everything else.
    Hidden,
    /// Shown by the active filter, after the show delay.
    Visible,
    /// Entrance animation has played. Never removed.
    Revealed,
}

/// Narrow interface over rendered cards.
///
/// Operations on unknown nodes are silent no-ops.
pub trait ViewAdapter {
    /// Cards inside filterable sections, in document order.
    fn filterable_cards(&self) -> Vec<NodeId>;
    /// Cards that take part in the entrance animation, in document order.
    fn reveal_candidates(&self) -> Vec<NodeId>;
    /// Raw space-separated role attribute, `None` if the node or attribute is missing.
    fn role_attribute(&self, node: NodeId) -> Option<String>;
    fn has_marker(&self, node: NodeId, marker: Marker) -> bool;
    fn set_marker(&mut self, node: NodeId, marker: Marker, present: bool);
    /// Layout box in page coordinates; `None` for missing or hidden nodes.
    fn bounds(&self, node: NodeId) -> Option<Rect>;
}
