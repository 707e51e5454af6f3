//! Graph construction from a work-item snapshot.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A **blocks** B": A must be finished before B can
//! start. Both link lists on an item produce edges in that direction:
//!
//! - `B.blockedBy` contains `A` → edge `A → B`
//! - `A.blocking` contains `B` → edge `A → B`
//!
//! The same link recorded on both sides yields a single edge.
//!
//! ## Cache Invalidation
//!
//! The graph carries a content hash of the edge set (BLAKE3 of the sorted
//! edge list). Callers can compare it against a stored value to tell whether
//! the blocking structure changed.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use plank_core::model::item::WorkItem;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// A directed dependency graph over item IDs.
///
/// Nodes are added in input order, so `NodeIndex::index()` matches the
/// position of the item's first occurrence among unique IDs.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Directed graph: nodes = item IDs, edges = blocking relationships.
    pub graph: DiGraph<String, ()>,
    /// Mapping from item ID to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 content hash of the edge set.
    pub content_hash: String,
}

impl DependencyGraph {
    /// Build the graph for `items`.
    ///
    /// Duplicate IDs keep their first occurrence. Links to IDs outside the
    /// snapshot and self-links are dropped.
    #[must_use]
    #[instrument(skip(items), fields(items = items.len()))]
    pub fn from_items(items: &[WorkItem]) -> Self {
        let mut graph = DiGraph::<String, ()>::with_capacity(items.len(), items.len());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(items.len());

        for item in items {
            if !node_map.contains_key(&item.id) {
                let idx = graph.add_node(item.id.clone());
                node_map.insert(item.id.clone(), idx);
            }
        }

        let mut edges: BTreeSet<(&str, &str)> = BTreeSet::new();
        let mut dropped = 0_usize;

        let links = items.iter().flat_map(|item| {
            let id = item.id.as_str();
            let incoming = item.blockers().iter().map(move |b| (b.as_str(), id));
            let outgoing = item.blocked_items().iter().map(move |b| (id, b.as_str()));
            incoming.chain(outgoing)
        });

        for (blocker, blocked) in links {
            let known = node_map.contains_key(blocker) && node_map.contains_key(blocked);
            if known && blocker != blocked {
                edges.insert((blocker, blocked));
            } else {
                dropped += 1;
            }
        }

        if dropped > 0 {
            debug!(dropped, "ignored self-links and links to unknown items");
        }

        let content_hash = compute_edge_hash(&edges);

        for (blocker, blocked) in &edges {
            if let (Some(&a), Some(&b)) = (node_map.get(*blocker), node_map.get(*blocked)) {
                graph.add_edge(a, b, ());
            }
        }

        Self {
            graph,
            node_map,
            content_hash,
        }
    }

    /// Return the number of nodes (items) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges (blocking relationships) in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for an item ID.
    #[must_use]
    pub fn node_index(&self, item_id: &str) -> Option<NodeIndex> {
        self.node_map.get(item_id).copied()
    }

    /// Return the item ID label for a node.
    #[must_use]
    pub fn item_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// IDs of the items `item_id` blocks, sorted.
    #[must_use]
    pub fn successors(&self, item_id: &str) -> Vec<&str> {
        self.neighbors(item_id, Direction::Outgoing)
    }

    /// IDs of the items blocking `item_id`, sorted.
    #[must_use]
    pub fn predecessors(&self, item_id: &str) -> Vec<&str> {
        self.neighbors(item_id, Direction::Incoming)
    }

    fn neighbors(&self, item_id: &str, direction: Direction) -> Vec<&str> {
        let Some(idx) = self.node_index(item_id) else {
            return Vec::new();
        };
        let mut ids: Vec<&str> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|n| self.item_id(n))
            .collect();
        ids.sort_unstable();
        ids
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Compute a BLAKE3 hash of the sorted edge list for cache invalidation.
fn compute_edge_hash(edges: &BTreeSet<(&str, &str)>) -> String {
    let mut hasher = blake3::Hasher::new();
    for (blocker, blocked) in edges {
        hasher.update(blocker.as_bytes());
        hasher.update(b"\x00");
        hasher.update(blocked.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
