//! Graph analytics providers.
//!
//! The metrics engine reads centrality scores through [`GraphAnalytics`]
//! and never calls an algorithm directly, so a different implementation
//! (another graph library, cached scores, a test double) can be dropped in
//! without touching the scoring code.
//!
//! | Metric      | Module            | Complexity |
//! |-------------|-------------------|------------|
//! | PageRank    | [`pagerank`]      | O(k·(V+E)) |
//! | Betweenness | [`betweenness`]   | O(V·E)     |
//! | Degree      | [`degree`]        | O(V+E)     |

use std::collections::HashMap;

use crate::graph::build::DependencyGraph;

pub mod betweenness;
pub mod degree;
pub mod pagerank;

pub use betweenness::betweenness_centrality;
pub use degree::{DegreeCentrality, degree_centrality};
pub use pagerank::{PageRankConfig, PageRankResult, pagerank};

/// Source of the centrality scores the metrics engine blends.
///
/// Maps are keyed by item ID. Implementations must return an entry for
/// every node; missing entries are read as 0.
pub trait GraphAnalytics {
    /// PageRank per item, in `[0, 1]`, all zero on an edgeless graph.
    fn pagerank(&self, graph: &DependencyGraph) -> HashMap<String, f64>;

    /// Betweenness per item, normalized to `[0, 1]`.
    fn betweenness(&self, graph: &DependencyGraph) -> HashMap<String, f64>;

    /// In/out/total degree per item.
    fn degree(&self, graph: &DependencyGraph) -> DegreeCentrality;
}

/// Default provider backed by the algorithms in this module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeAnalytics {
    pub pagerank: PageRankConfig,
}

impl NativeAnalytics {
    #[must_use]
    pub const fn new(pagerank: PageRankConfig) -> Self {
        Self { pagerank }
    }
}

impl GraphAnalytics for NativeAnalytics {
    fn pagerank(&self, graph: &DependencyGraph) -> HashMap<String, f64> {
        pagerank(graph, &self.pagerank).scores
    }

    fn betweenness(&self, graph: &DependencyGraph) -> HashMap<String, f64> {
        betweenness_centrality(graph)
    }

    fn degree(&self, graph: &DependencyGraph) -> DegreeCentrality {
        degree_centrality(graph)
    }
}

impl<T: GraphAnalytics + ?Sized> GraphAnalytics for &T {
    fn pagerank(&self, graph: &DependencyGraph) -> HashMap<String, f64> {
        (**self).pagerank(graph)
    }

    fn betweenness(&self, graph: &DependencyGraph) -> HashMap<String, f64> {
        (**self).betweenness(graph)
    }

    fn degree(&self, graph: &DependencyGraph) -> DegreeCentrality {
        (**self).degree(graph)
    }
}

impl<T: GraphAnalytics + ?Sized> GraphAnalytics for Box<T> {
    fn pagerank(&self, graph: &DependencyGraph) -> HashMap<String, f64> {
        (**self).pagerank(graph)
    }

    fn betweenness(&self, graph: &DependencyGraph) -> HashMap<String, f64> {
        (**self).betweenness(graph)
    }

    fn degree(&self, graph: &DependencyGraph) -> DegreeCentrality {
        (**self).degree(graph)
    }
}
