//! Per-item structural metrics and the scores derived from them.
//!
//! # Definitions
//!
//! | Term             | Definition |
//! |------------------|------------|
//! | `unblock_count`  | Distinct items reachable through outgoing edges. |
//! | `depth`          | Longest chain of blockers leading to the item (0 when unblocked). |
//! | `priority_weight`| `5 - ordinal`: urgent 4, high 3, medium 2, low 1. |
//! | critical path    | Weight ≥ 3 and blocks at least one item. |
//!
//! # Scores
//!
//! ```text
//! critical_score = weight * (1 + out) * (1 + unblock * 0.5)
//! impact_score   = 0.30 * PR*100 + 0.20 * BC*100
//!                + 0.25 * min(out*10, 100) + 0.25 * min(unblock*5, 100)
//! ```
//!
//! The caps bound what any single raw metric can add before blending, so
//! `impact_score` stays in `[0, 100]`.

use std::collections::HashSet;

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use plank_core::model::priority::Priority;
use serde::Serialize;

use crate::graph::build::DependencyGraph;

/// Weight at or above which an item that blocks others is on the critical path.
pub const CRITICAL_PATH_MIN_WEIGHT: u8 = 3;

const PAGERANK_WEIGHT: f64 = 0.30;
const BETWEENNESS_WEIGHT: f64 = 0.20;
const OUT_DEGREE_WEIGHT: f64 = 0.25;
const UNBLOCK_WEIGHT: f64 = 0.25;

// ---------------------------------------------------------------------------
// ItemMetrics
// ---------------------------------------------------------------------------

/// Metrics record for a single item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetrics {
    pub page_rank: f64,
    pub betweenness: f64,
    pub in_degree: usize,
    pub out_degree: usize,
    pub degree: usize,
    pub unblock_count: usize,
    pub depth: usize,
    pub priority_weight: u8,
    pub is_critical_path: bool,
    pub critical_score: f64,
    pub impact_score: f64,
}

/// Structural inputs for one item; the derived scores are filled in by
/// [`ItemMetrics::from_inputs`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricInputs {
    pub page_rank: f64,
    pub betweenness: f64,
    pub in_degree: usize,
    pub out_degree: usize,
    pub unblock_count: usize,
    pub depth: usize,
    pub priority: Priority,
}

impl ItemMetrics {
    #[must_use]
    pub fn from_inputs(inputs: &MetricInputs) -> Self {
        let priority_weight = inputs.priority.weight();
        Self {
            page_rank: inputs.page_rank,
            betweenness: inputs.betweenness,
            in_degree: inputs.in_degree,
            out_degree: inputs.out_degree,
            degree: inputs.in_degree + inputs.out_degree,
            unblock_count: inputs.unblock_count,
            depth: inputs.depth,
            priority_weight,
            is_critical_path: is_critical_path(priority_weight, inputs.out_degree),
            critical_score: critical_score(priority_weight, inputs.out_degree, inputs.unblock_count),
            impact_score: impact_score(
                inputs.page_rank,
                inputs.betweenness,
                inputs.out_degree,
                inputs.unblock_count,
            ),
        }
    }

    /// Whether nothing blocks this item.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.in_degree == 0
    }
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

#[must_use]
pub const fn is_critical_path(priority_weight: u8, out_degree: usize) -> bool {
    priority_weight >= CRITICAL_PATH_MIN_WEIGHT && out_degree > 0
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn critical_score(priority_weight: u8, out_degree: usize, unblock_count: usize) -> f64 {
    f64::from(priority_weight) * (1.0 + out_degree as f64) * (1.0 + unblock_count as f64 * 0.5)
}

/// Composite 0-100 impact score.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn impact_score(page_rank: f64, betweenness: f64, out_degree: usize, unblock_count: usize) -> f64 {
    let pr = page_rank.clamp(0.0, 1.0) * 100.0;
    let bc = betweenness.clamp(0.0, 1.0) * 100.0;
    let out = (out_degree as f64 * 10.0).min(100.0);
    let unblock = (unblock_count as f64 * 5.0).min(100.0);

    (PAGERANK_WEIGHT * pr)
        + (BETWEENNESS_WEIGHT * bc)
        + (OUT_DEGREE_WEIGHT * out)
        + (UNBLOCK_WEIGHT * unblock)
}

// ---------------------------------------------------------------------------
// Structural traversals
// ---------------------------------------------------------------------------

/// Unblock count per node, indexed by `NodeIndex::index()`.
///
/// Counts each reachable node once, however many paths lead to it. A node
/// that can reach itself through a cycle does not count itself.
#[must_use]
pub fn unblock_counts(graph: &DependencyGraph) -> Vec<usize> {
    let g = &graph.graph;
    let mut counts = vec![0; g.node_count()];
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut stack: Vec<NodeIndex> = Vec::new();

    for start in g.node_indices() {
        visited.clear();
        visited.insert(start);
        stack.clear();
        stack.push(start);

        while let Some(node) = stack.pop() {
            for next in g.neighbors_directed(node, Direction::Outgoing) {
                if visited.insert(next) {
                    stack.push(next);
                }
            }
        }

        counts[start.index()] = visited.len() - 1;
    }

    counts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnStack,
    Done,
}

struct Frame {
    node: NodeIndex,
    blockers: Vec<NodeIndex>,
    next: usize,
    best: usize,
}

impl Frame {
    fn new(graph: &DependencyGraph, node: NodeIndex) -> Self {
        Self {
            node,
            blockers: graph
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .collect(),
            next: 0,
            best: 0,
        }
    }
}

/// Depth per node, indexed by `NodeIndex::index()`.
///
/// Memoized and iterative, so long chains cannot overflow the call stack.
/// A blocker that is still on the traversal stack (a cycle) contributes
/// nothing, which keeps cyclic input finite.
#[must_use]
pub fn depths(graph: &DependencyGraph) -> Vec<usize> {
    let n = graph.node_count();
    let mut depth = vec![0; n];
    let mut state = vec![Visit::New; n];
    let mut stack: Vec<Frame> = Vec::new();

    for start in graph.graph.node_indices() {
        if state[start.index()] != Visit::New {
            continue;
        }
        state[start.index()] = Visit::OnStack;
        stack.push(Frame::new(graph, start));

        while let Some(frame) = stack.last_mut() {
            if let Some(&blocker) = frame.blockers.get(frame.next) {
                frame.next += 1;
                match state[blocker.index()] {
                    Visit::New => {
                        state[blocker.index()] = Visit::OnStack;
                        stack.push(Frame::new(graph, blocker));
                    }
                    Visit::Done => frame.best = frame.best.max(depth[blocker.index()] + 1),
                    Visit::OnStack => {}
                }
                continue;
            }

            let node = frame.node;
            depth[node.index()] = frame.best;
            state[node.index()] = Visit::Done;
            stack.pop();

            if let Some(parent) = stack.last_mut() {
                parent.best = parent.best.max(depth[node.index()] + 1);
            }
        }
    }

    depth
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
