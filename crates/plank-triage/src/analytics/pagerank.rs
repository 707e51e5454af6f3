//! PageRank by power iteration.
//!
//! # Algorithm
//!
//! ```text
//! PR(v) = (1 - d) / N + d * Σ PR(u) / out_degree(u)   for each u → v
//! ```
//!
//! where `d` is the damping factor (default 0.85). Rank held by nodes
//! without outgoing edges is spread evenly over all nodes, so scores always
//! sum to 1. Iteration stops once the L1 norm of the change between two
//! rounds drops below the tolerance, or after `max_iter` rounds.
//!
//! A graph without edges carries no dependency signal; every node gets 0
//! there instead of the uniform `1 / N`.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::visit::{IntoNodeIdentifiers, NodeIndexable};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::graph::build::DependencyGraph;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for PageRank computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankConfig {
    /// Damping factor (probability of following a link vs teleporting).
    /// Default: 0.85.
    pub damping: f64,
    /// Convergence threshold: stop when L1 norm of rank delta < tolerance.
    /// Default: 1e-6.
    pub tolerance: f64,
    /// Maximum number of iterations.
    /// Default: 100.
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-6,
            max_iter: 100,
        }
    }
}

/// Result of a PageRank computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// PageRank scores: item ID → score.
    pub scores: HashMap<String, f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the algorithm converged within `max_iter`.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Full PageRank
// ---------------------------------------------------------------------------

/// Compute PageRank for every item in `graph`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(graph, config), fields(nodes = graph.node_count()))]
pub fn pagerank(graph: &DependencyGraph, config: &PageRankConfig) -> PageRankResult {
    let g = &graph.graph;
    let n = g.node_count();

    if n == 0 || g.edge_count() == 0 {
        return PageRankResult {
            scores: g
                .node_indices()
                .filter_map(|idx| g.node_weight(idx))
                .map(|id| (id.clone(), 0.0))
                .collect(),
            iterations: 0,
            converged: true,
        };
    }

    let n_f64 = n as f64;
    let base = (1.0 - config.damping) / n_f64;

    let mut ranks = vec![1.0 / n_f64; n];
    let mut new_ranks = vec![0.0_f64; n];

    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iter {
        iterations += 1;

        for r in &mut new_ranks {
            *r = base;
        }

        // Pool dangling rank once per round instead of per dangling node.
        let mut dangling = 0.0;

        for node in g.node_identifiers() {
            let idx = g.to_index(node);
            let out_degree = g.neighbors_directed(node, Direction::Outgoing).count();

            if out_degree == 0 {
                dangling += ranks[idx];
            } else {
                let share = config.damping * ranks[idx] / out_degree as f64;
                for neighbor in g.neighbors_directed(node, Direction::Outgoing) {
                    new_ranks[g.to_index(neighbor)] += share;
                }
            }
        }

        let dangling_share = config.damping * dangling / n_f64;
        for r in &mut new_ranks {
            *r += dangling_share;
        }

        let delta: f64 = ranks
            .iter()
            .zip(new_ranks.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut ranks, &mut new_ranks);

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    if converged {
        debug!(iterations, "pagerank converged");
    } else {
        warn!(iterations, tolerance = config.tolerance, "pagerank did not converge");
    }

    let scores = g
        .node_identifiers()
        .filter_map(|node| {
            g.node_weight(node)
                .map(|id| (id.clone(), ranks[g.to_index(node)]))
        })
        .collect();

    PageRankResult {
        scores,
        iterations,
        converged,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use plank_core::model::item::WorkItem;

    fn chain(ids: &[&str]) -> DependencyGraph {
        let items: Vec<WorkItem> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let item = WorkItem::new(*id, *id);
                match ids.get(i + 1) {
                    Some(next) => item.with_blocking([*next]),
                    None => item,
                }
            })
            .collect();
        DependencyGraph::from_items(&items)
    }

    #[test]
    fn empty_graph() {
        let result = pagerank(&DependencyGraph::from_items(&[]), &PageRankConfig::default());
        assert!(result.scores.is_empty());
        assert!(result.converged);
    }

    #[test]
    fn edgeless_graph_scores_zero() {
        let items = [WorkItem::new("a", "A"), WorkItem::new("b", "B")];
        let result = pagerank(&DependencyGraph::from_items(&items), &PageRankConfig::default());
        assert_eq!(result.scores.len(), 2);
        assert!(result.scores.values().all(|s| s.abs() < f64::EPSILON));
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn scores_sum_to_one() {
        let result = pagerank(&chain(&["a", "b", "c", "d"]), &PageRankConfig::default());
        let total: f64 = result.scores.values().sum();
        assert!((total - 1.0).abs() < 1e-6, "total = {total}");
    }

    #[test]
    fn rank_flows_downstream() {
        let result = pagerank(&chain(&["a", "b", "c"]), &PageRankConfig::default());
        assert!(result.scores["c"] > result.scores["b"]);
        assert!(result.scores["b"] > result.scores["a"]);
    }

    #[test]
    fn two_node_chain_matches_closed_form() {
        // a → b, d = 0.85, b dangling:
        //   PR(a) = 0.075 + 0.425 * PR(b)
        //   PR(b) = 0.075 + 0.85 * PR(a) + 0.425 * PR(b)
        // with PR(a) + PR(b) = 1 → PR(a) = 0.5 / 1.425.
        let result = pagerank(&chain(&["a", "b"]), &PageRankConfig::default());
        let expected_a = 0.5 / 1.425;
        assert!((result.scores["a"] - expected_a).abs() < 1e-5);
        assert!((result.scores["b"] - (1.0 - expected_a)).abs() < 1e-5);
    }

    #[test]
    fn iteration_cap_is_respected() {
        let config = PageRankConfig {
            max_iter: 1,
            tolerance: 0.0,
            ..PageRankConfig::default()
        };
        let result = pagerank(&chain(&["a", "b", "c"]), &config);
        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
    }
}
