//! Betweenness centrality via Brandes' algorithm.
//!
//! Betweenness measures how often a node lies on shortest paths between
//! other pairs of nodes. High-betweenness items are bottlenecks: work on
//! both sides of them has to flow through.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted directed graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes first).
//! 3. Sum the dependency scores across all source nodes.
//!
//! Complexity: O(V * E).
//!
//! Scores are normalized by `(n - 1) * (n - 2)`, the number of ordered
//! pairs a node can sit between, so they fall in `[0, 1]`.

use std::collections::{HashMap, VecDeque};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::visit::{IntoNodeIdentifiers, NodeIndexable};
use tracing::instrument;

use crate::graph::build::DependencyGraph;

/// Compute normalized betweenness centrality for all items in the graph.
///
/// Graphs with fewer than three nodes or no edges score 0 everywhere.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn betweenness_centrality(graph: &DependencyGraph) -> HashMap<String, f64> {
    let g = &graph.graph;
    let n = g.node_count();

    if n < 3 || g.edge_count() == 0 {
        return g
            .node_indices()
            .filter_map(|idx| g.node_weight(idx))
            .map(|id| (id.clone(), 0.0))
            .collect();
    }

    // Node-indexed betweenness accumulator.
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in g.node_identifiers() {
        let si = g.to_index(s);

        // Nodes in order of discovery (farthest popped first).
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);

        // predecessors[w]: nodes immediately preceding w on shortest paths from s.
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        // dist[t]: distance from s to t (None = unvisited).
        let mut dist: Vec<Option<usize>> = vec![None; n];
        dist[si] = Some(0);

        let mut queue: VecDeque<NodeIndex> = VecDeque::from([s]);

        while let Some(v) = queue.pop_front() {
            let vi = g.to_index(v);
            stack.push(v);
            let next_dist = dist[vi].map_or(0, |d| d + 1);

            for w in g.neighbors_directed(v, Direction::Outgoing) {
                let wi = g.to_index(w);

                if dist[wi].is_none() {
                    dist[wi] = Some(next_dist);
                    queue.push_back(w);
                }

                if dist[wi] == Some(next_dist) {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            let wi = g.to_index(w);

            for &v in &predecessors[wi] {
                let vi = g.to_index(v);
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }

            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    let scale = ((n - 1) * (n - 2)) as f64;

    g.node_identifiers()
        .filter_map(|idx| {
            g.node_weight(idx)
                .map(|id| (id.clone(), cb[g.to_index(idx)] / scale))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
