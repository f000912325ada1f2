//! Faceted card filter.
//!
//! Partitions every card in a filterable section into shown and hidden for
//! the active facet, by flipping markers through a [`ViewAdapter`]. Each pass
//! re-scans the view, so cards rendered since the previous pass are picked up.
//!
//! Hiding is immediate. Showing is two-step: the `Hidden` marker is dropped
//! at once and `Visible` is added after the show delay, via
//! [`FilterEngine::commit_shows`] for the pass's generation. A newer pass
//! supersedes the pending shows of an older one.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::types::facet::{FilterFacet, WILDCARD_TAG};
use crate::view::{Marker, NodeId, ViewAdapter};

/// Result of one filter pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOutcome {
    pub facet: FilterFacet,
    pub generation: u64,
    /// Cards matching the facet, in document order.
    pub shown: Vec<NodeId>,
    /// Cards excluded by the facet, in document order.
    pub hidden: Vec<NodeId>,
}

impl FilterOutcome {
    /// True when nothing matched; the host renders its "no results" state.
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

/// Whether a card with `role_attr` is shown under `facet`.
///
/// A card is shown under the wildcard facet, under any of its roles, and
/// under every facet when it carries no role besides the wildcard.
pub fn card_matches(facet: FilterFacet, role_attr: &str) -> bool {
    if facet == FilterFacet::All {
        return true;
    }
    let tags: HashSet<&str> = role_attr.split_whitespace().collect();
    let has_specific_role = tags.iter().any(|t| *t != WILDCARD_TAG);
    !has_specific_role || tags.contains(facet.tag())
}

/// Holds the active facet and the shows still waiting for their delay.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    active: FilterFacet,
    generation: u64,
    pending_shows: Vec<NodeId>,
    show_delay: Duration,
}

impl FilterEngine {
    pub fn new(show_delay: Duration) -> Self {
        Self {
            active: FilterFacet::All,
            generation: 0,
            pending_shows: Vec::new(),
            show_delay,
        }
    }

    pub fn active_facet(&self) -> FilterFacet {
        self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn show_delay(&self) -> Duration {
        self.show_delay
    }

    pub fn has_pending_shows(&self) -> bool {
        !self.pending_shows.is_empty()
    }

    /// Applies `facet` to every filterable card currently in `view`.
    pub fn apply_filter<V: ViewAdapter + ?Sized>(&mut self, view: &mut V, facet: FilterFacet) -> FilterOutcome {
        self.active = facet;
        self.generation += 1;

        let mut shown = Vec::new();
        let mut hidden = Vec::new();
        for node in view.filterable_cards() {
            let Some(role_attr) = view.role_attribute(node) else {
                continue;
            };
            if card_matches(facet, &role_attr) {
                view.set_marker(node, Marker::Hidden, false);
                shown.push(node);
            } else {
                view.set_marker(node, Marker::Hidden, true);
                view.set_marker(node, Marker::Visible, false);
                hidden.push(node);
            }
        }

        self.pending_shows = shown.clone();
        debug!(facet = %facet, generation = self.generation, shown = shown.len(), hidden = hidden.len(), "filter applied");
        FilterOutcome {
            facet,
            generation: self.generation,
            shown,
            hidden,
        }
    }

    /// Marks the shown cards of pass `generation` visible.
    ///
    /// Does nothing for a superseded pass. Cards hidden since the pass are
    /// skipped. Returns how many cards were marked.
    pub fn commit_shows<V: ViewAdapter + ?Sized>(&mut self, view: &mut V, generation: u64) -> usize {
        if generation != self.generation {
            return 0;
        }
        let mut marked = 0;
        for node in std::mem::take(&mut self.pending_shows) {
            if view.role_attribute(node).is_none() || view.has_marker(node, Marker::Hidden) {
                continue;
            }
            view.set_marker(node, Marker::Visible, true);
            marked += 1;
        }
        marked
    }

    /// Applies `facet` and commits the shows in the same call.
    pub fn apply_filter_now<V: ViewAdapter + ?Sized>(&mut self, view: &mut V, facet: FilterFacet) -> FilterOutcome {
        let outcome = self.apply_filter(view, facet);
        self.commit_shows(view, outcome.generation);
        outcome
    }

    /// Applies `facet`, waits the show delay, then commits.
    pub async fn apply_filter_animated<V: ViewAdapter + ?Sized>(
        &mut self,
        view: &mut V,
        facet: FilterFacet,
    ) -> FilterOutcome {
        let outcome = self.apply_filter(view, facet);
        tokio::time::sleep(self.show_delay).await;
        self.commit_shows(view, outcome.generation);
        outcome
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}
