//! Synthetic card tree.
//!
//! Models the rendered page as sections of cards laid out in a grid. Cards
//! carry a role attribute and a marker set; hidden cards take no space and
//! every structural change or hide/unhide reflows the page. Insertions and
//! removals are recorded as [`Mutation`]s for the host to drain.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::geometry::Rect;
use super::{Marker, ViewAdapter};
use crate::types::catalog::CatalogItem;

pub type NodeId = usize;
pub type SectionId = usize;

/// Structural change to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Inserted(NodeId),
    Removed(NodeId),
}

/// Grid geometry shared by every section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub card_width: f64,
    pub card_height: f64,
    pub gap: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 3,
            card_width: 320.0,
            card_height: 240.0,
            gap: 24.0,
        }
    }
}

/// One rendered card.
#[derive(Debug, Clone, Serialize)]
pub struct CardNode {
    pub item_id: String,
    pub section: SectionId,
    /// Space-separated role tags; `None` if the card was rendered without one.
    pub role_attr: Option<String>,
    pub markers: BTreeSet<Marker>,
    pub bounds: Rect,
    /// Whether the card takes part in entrance animations.
    pub animated: bool,
}

#[derive(Debug, Clone)]
struct Section {
    name: String,
    filterable: bool,
    cards: Vec<NodeId>,
}

/// In-memory page of card sections.
#[derive(Debug, Clone, Default)]
pub struct CardTree {
    /// Live cards only. Ids are never reused, so a stale id stays dead.
    nodes: BTreeMap<NodeId, CardNode>,
    next_node: NodeId,
    sections: Vec<Section>,
    mutations: Vec<Mutation>,
    layout: GridLayout,
}

impl CardTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: GridLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Appends a section below the existing ones.
    pub fn add_section(&mut self, name: &str, filterable: bool) -> SectionId {
        self.sections.push(Section {
            name: name.to_string(),
            filterable,
            cards: Vec::new(),
        });
        self.sections.len() - 1
    }

    pub fn section_by_name(&self, name: &str) -> Option<SectionId> {
        self.sections.iter().position(|s| s.name == name)
    }

    /// Appends a card to `section`. Returns `None` for an unknown section.
    pub fn insert_card(
        &mut self,
        section: SectionId,
        item_id: &str,
        role_attr: Option<&str>,
    ) -> Option<NodeId> {
        let id = self.push_card(section, item_id, role_attr)?;
        self.relayout();
        Some(id)
    }

    fn push_card(&mut self, section: SectionId, item_id: &str, role_attr: Option<&str>) -> Option<NodeId> {
        if section >= self.sections.len() {
            return None;
        }
        let id = self.next_node;
        self.next_node += 1;
        self.nodes.insert(
            id,
            CardNode {
                item_id: item_id.to_string(),
                section,
                role_attr: role_attr.map(str::to_string),
                markers: BTreeSet::new(),
                bounds: Rect::default(),
                animated: true,
            },
        );
        self.sections[section].cards.push(id);
        self.mutations.push(Mutation::Inserted(id));
        Some(id)
    }

    /// Replaces the cards of `section` with one card per item.
    pub fn render_items(&mut self, section: SectionId, items: &[CatalogItem]) -> Vec<NodeId> {
        if section >= self.sections.len() {
            return Vec::new();
        }
        for node in std::mem::take(&mut self.sections[section].cards) {
            self.nodes.remove(&node);
            self.mutations.push(Mutation::Removed(node));
        }
        let ids = items
            .iter()
            .filter_map(|item| self.push_card(section, &item.id, Some(&item.role_attribute())))
            .collect();
        self.relayout();
        ids
    }

    pub fn remove_card(&mut self, node: NodeId) -> bool {
        let Some(card) = self.nodes.remove(&node) else {
            return false;
        };
        self.sections[card.section].cards.retain(|&n| n != node);
        self.mutations.push(Mutation::Removed(node));
        self.relayout();
        true
    }

    pub fn card(&self, node: NodeId) -> Option<&CardNode> {
        self.nodes.get(&node)
    }

    /// First live card rendering `item_id`.
    pub fn node_for_item(&self, item_id: &str) -> Option<NodeId> {
        self.live_nodes()
            .find(|&(_, card)| card.item_id == item_id)
            .map(|(id, _)| id)
    }

    pub fn set_animated(&mut self, node: NodeId, animated: bool) {
        if let Some(card) = self.nodes.get_mut(&node) {
            card.animated = animated;
        }
    }

    /// Drains structural changes recorded since the last call.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    /// Live cards in document order (section order, then insertion order).
    pub fn live_nodes(&self) -> impl Iterator<Item = (NodeId, &CardNode)> + '_ {
        self.sections
            .iter()
            .flat_map(|s| s.cards.iter().copied())
            .filter_map(move |id| self.card(id).map(|card| (id, card)))
    }

    pub fn card_count(&self) -> usize {
        self.live_nodes().count()
    }

    /// Item ids of cards not hidden by the filter.
    pub fn displayed_items(&self) -> Vec<String> {
        self.live_nodes()
            .filter(|(_, card)| !card.markers.contains(&Marker::Hidden))
            .map(|(_, card)| card.item_id.clone())
            .collect()
    }

    /// Height of the laid-out page.
    pub fn page_height(&self) -> f64 {
        self.live_nodes()
            .filter(|(_, card)| !card.markers.contains(&Marker::Hidden))
            .map(|(_, card)| card.bounds.bottom())
            .fold(0.0, f64::max)
    }

    fn relayout(&mut self) {
        let layout = self.layout;
        let columns = layout.columns.max(1);
        let row_height = layout.card_height + layout.gap;
        let mut origin_y = 0.0;

        for section in &self.sections {
            let mut slot = 0usize;
            for &node in &section.cards {
                let Some(card) = self.nodes.get_mut(&node) else {
                    continue;
                };
                if card.markers.contains(&Marker::Hidden) {
                    card.bounds = Rect::default();
                    continue;
                }
                let col = slot % columns;
                let row = slot / columns;
                card.bounds = Rect::new(
                    col as f64 * (layout.card_width + layout.gap),
                    origin_y + row as f64 * row_height,
                    layout.card_width,
                    layout.card_height,
                );
                slot += 1;
            }
            let rows = slot.div_ceil(columns);
            origin_y += rows as f64 * row_height;
        }
    }
}

impl ViewAdapter for CardTree {
    fn filterable_cards(&self) -> Vec<NodeId> {
        self.live_nodes()
            .filter(|(_, card)| self.sections[card.section].filterable)
            .map(|(id, _)| id)
            .collect()
    }

    fn reveal_candidates(&self) -> Vec<NodeId> {
        self.live_nodes()
            .filter(|(_, card)| card.animated)
            .map(|(id, _)| id)
            .collect()
    }

    fn role_attribute(&self, node: NodeId) -> Option<String> {
        self.card(node).and_then(|card| card.role_attr.clone())
    }

    fn has_marker(&self, node: NodeId, marker: Marker) -> bool {
        self.card(node)
            .map(|card| card.markers.contains(&marker))
            .unwrap_or(false)
    }

    fn set_marker(&mut self, node: NodeId, marker: Marker, present: bool) {
        let Some(card) = self.nodes.get_mut(&node) else {
            return;
        };
        let changed = if present {
            card.markers.insert(marker)
        } else {
            card.markers.remove(&marker)
        };
        if changed && marker == Marker::Hidden {
            self.relayout();
        }
    }

    fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.card(node)
            .filter(|card| !card.markers.contains(&Marker::Hidden))
            .map(|card| card.bounds)
    }
}
