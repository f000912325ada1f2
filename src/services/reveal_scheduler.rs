//! Viewport reveal scheduler.
//!
//! Plays each card's entrance animation once, when it first comes near the
//! viewport. Works like a single intersection observer: candidates are
//! watched, an intersecting candidate is marked `Revealed` and unwatched.
//! Cards rendered later are picked up by [`RevealScheduler::handle_mutations`].
//!
//! Cards hidden by the filter are never revealed. They are skipped when
//! enumerating candidates and, if hidden after being watched, stay watched
//! until they are shown again.

use std::collections::BTreeSet;

use tracing::debug;

use crate::view::{Marker, Mutation, NodeId, Rect, ViewAdapter};

/// Observer geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Pixels added around the viewport so cards trigger just before entering.
    pub root_margin_px: f64,
    /// Minimum visible fraction of a card, in `0.0..=1.0`.
    pub threshold: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            root_margin_px: 40.0,
            threshold: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Detached,
    Attached,
    Disposed,
}

/// One-shot entrance animation trigger for a view.
#[derive(Debug, Clone)]
pub struct RevealScheduler {
    config: RevealConfig,
    watched: BTreeSet<NodeId>,
    lifecycle: Lifecycle,
}

impl RevealScheduler {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            watched: BTreeSet::new(),
            lifecycle: Lifecycle::Detached,
        }
    }

    pub fn config(&self) -> RevealConfig {
        self.config
    }

    pub fn is_attached(&self) -> bool {
        self.lifecycle == Lifecycle::Attached
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle == Lifecycle::Disposed
    }

    pub fn watched(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.watched.iter().copied()
    }

    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    /// Starts watching `view`. Returns how many cards are watched.
    ///
    /// A disposed scheduler cannot be re-attached.
    pub fn attach<V: ViewAdapter + ?Sized>(&mut self, view: &V) -> usize {
        if self.lifecycle == Lifecycle::Disposed {
            return 0;
        }
        self.lifecycle = Lifecycle::Attached;
        self.rescan(view);
        self.watched.len()
    }

    /// Watches every candidate not yet revealed or hidden. Returns newly watched cards.
    pub fn rescan<V: ViewAdapter + ?Sized>(&mut self, view: &V) -> Vec<NodeId> {
        if self.lifecycle != Lifecycle::Attached {
            return Vec::new();
        }
        let mut added = Vec::new();
        for node in view.reveal_candidates() {
            if view.has_marker(node, Marker::Revealed) || view.has_marker(node, Marker::Hidden) {
                continue;
            }
            if self.watched.insert(node) {
                added.push(node);
            }
        }
        if !added.is_empty() {
            debug!(count = added.len(), "reveal candidates added");
        }
        added
    }

    /// Reacts to structural changes: drops removed cards, rescans on insertion.
    pub fn handle_mutations<V: ViewAdapter + ?Sized>(&mut self, view: &V, mutations: &[Mutation]) -> Vec<NodeId> {
        if self.lifecycle != Lifecycle::Attached {
            return Vec::new();
        }
        let mut inserted = false;
        for mutation in mutations {
            match mutation {
                Mutation::Inserted(_) => inserted = true,
                Mutation::Removed(node) => {
                    self.watched.remove(node);
                }
            }
        }
        if inserted {
            self.rescan(view)
        } else {
            Vec::new()
        }
    }

    /// Reveals watched cards intersecting `viewport`. Returns the revealed cards.
    pub fn on_viewport<V: ViewAdapter + ?Sized>(&mut self, view: &mut V, viewport: Rect) -> Vec<NodeId> {
        if self.lifecycle != Lifecycle::Attached {
            return Vec::new();
        }
        let root = viewport.expand(self.config.root_margin_px);
        let threshold = self.config.threshold.clamp(0.0, 1.0);

        let mut revealed = Vec::new();
        let mut gone = Vec::new();
        for &node in &self.watched {
            if view.has_marker(node, Marker::Hidden) {
                continue;
            }
            // Only removed nodes lack a box while not hidden.
            let Some(bounds) = view.bounds(node) else {
                gone.push(node);
                continue;
            };
            let Some(overlap) = bounds.intersection(&root) else {
                continue;
            };
            let fraction = bounds.visible_fraction(&root);
            let crossed = if threshold == 0.0 {
                overlap.area() > 0.0 || bounds.area() == 0.0
            } else {
                fraction >= threshold
            };
            if crossed {
                revealed.push(node);
            }
        }

        for node in gone.into_iter().chain(revealed.iter().copied()) {
            self.watched.remove(&node);
        }
        for &node in &revealed {
            view.set_marker(node, Marker::Revealed, true);
        }
        if !revealed.is_empty() {
            debug!(count = revealed.len(), remaining = self.watched.len(), "cards revealed");
        }
        revealed
    }

    /// Stops watching everything. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.watched.clear();
        self.lifecycle = Lifecycle::Disposed;
    }
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}
