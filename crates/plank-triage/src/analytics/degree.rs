//! Degree centrality straight from the adjacency structure.

use std::collections::HashMap;

use petgraph::Direction;
use serde::Serialize;

use crate::graph::build::DependencyGraph;

/// Per-item degree centrality scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DegreeCentrality {
    /// In-degree per item ID (how many things block this item).
    pub in_degree: HashMap<String, usize>,
    /// Out-degree per item ID (how many things this item blocks).
    pub out_degree: HashMap<String, usize>,
    /// Total degree per item ID (in + out).
    pub total_degree: HashMap<String, usize>,
}

/// Compute degree centrality for all items in the graph.
#[must_use]
pub fn degree_centrality(graph: &DependencyGraph) -> DegreeCentrality {
    let g = &graph.graph;
    let mut in_degree = HashMap::with_capacity(g.node_count());
    let mut out_degree = HashMap::with_capacity(g.node_count());
    let mut total_degree = HashMap::with_capacity(g.node_count());

    for idx in g.node_indices() {
        let Some(id) = g.node_weight(idx) else {
            continue;
        };
        let in_d = g.neighbors_directed(idx, Direction::Incoming).count();
        let out_d = g.neighbors_directed(idx, Direction::Outgoing).count();

        in_degree.insert(id.clone(), in_d);
        out_degree.insert(id.clone(), out_d);
        total_degree.insert(id.clone(), in_d + out_d);
    }

    DegreeCentrality {
        in_degree,
        out_degree,
        total_degree,
    }
}
