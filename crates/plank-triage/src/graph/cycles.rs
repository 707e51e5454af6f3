//! Cycle detection for dependency graphs.
//!
//! Blocking cycles are invalid data, but a snapshot can still contain them
//! (hand-edited files, links made from two clients at once). Triage keeps
//! working on such input and reports the cycles instead of failing.

#![allow(clippy::module_name_repetitions)]

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::build::DependencyGraph;

/// Find all cycles currently present in `graph`.
///
/// Each entry is a sorted list of item IDs in one strongly connected
/// component (SCC) with more than one member. Self-links never reach the
/// graph, so single-node components are never cycles.
#[must_use]
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Vec<String>> {
    let g = &graph.graph;
    let mut cycles: Vec<Vec<String>> = tarjan_scc(g)
        .into_iter()
        .filter(|component| component.len() > 1)
        .map(|component| {
            let mut ids: Vec<String> = component.into_iter().map(|idx| node_id(g, idx)).collect();
            ids.sort_unstable();
            ids
        })
        .collect();

    cycles.sort_unstable();
    cycles
}

fn node_id(graph: &DiGraph<String, ()>, idx: NodeIndex) -> String {
    graph
        .node_weight(idx)
        .cloned()
        .unwrap_or_else(|| format!("#{}", idx.index()))
}
