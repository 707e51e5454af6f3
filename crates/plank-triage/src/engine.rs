//! Triage computation and the fingerprint-gated engine around it.
//!
//! [`compute_triage`] is a pure function of the item snapshot: it builds
//! the dependency graph, asks a [`GraphAnalytics`] provider for centrality,
//! derives per-item metrics and classifies items (ready, blocked, critical
//! path, high impact).
//!
//! [`TriageEngine`] wraps it for interactive use. It remembers the
//! structural fingerprint of the last snapshot and only recomputes when
//! ids, priorities or blocking links change; with a [`Debouncer`] it also
//! coalesces bursts of changes.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use plank_core::config::TriageSettings;
use plank_core::fingerprint::structural_fingerprint;
use plank_core::model::item::WorkItem;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::analytics::{GraphAnalytics, PageRankConfig};
use crate::graph::{DependencyGraph, find_cycles};
use crate::metrics::{ItemMetrics, MetricInputs, depths, unblock_counts};
use crate::rank::{ImpactLevel, impact_level, sort_by_impact};
use crate::schedule::Debouncer;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TriageConfig {
    pub pagerank: PageRankConfig,
    /// Quiet period used by [`TriageEngine::notify`] / [`TriageEngine::poll`].
    pub debounce: Duration,
    /// Lowest [`ImpactLevel`] reported under `high_impact`.
    pub high_impact_min: ImpactLevel,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            pagerank: PageRankConfig::default(),
            debounce: Duration::from_millis(300),
            high_impact_min: ImpactLevel::High,
        }
    }
}

impl From<&TriageSettings> for TriageConfig {
    fn from(settings: &TriageSettings) -> Self {
        Self {
            pagerank: PageRankConfig {
                damping: settings.damping,
                tolerance: settings.tolerance,
                max_iter: settings.max_iter,
            },
            debounce: Duration::from_millis(settings.debounce_ms),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything the board needs from one triage pass.
///
/// ID lists follow input order except `ranked`, which is ordered by impact.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageReport {
    pub metrics: HashMap<String, ItemMetrics>,
    pub ranked: Vec<String>,
    pub ready: Vec<String>,
    pub blocked: Vec<String>,
    pub critical_path: Vec<String>,
    pub high_impact: Vec<String>,
    pub ready_count: usize,
    pub blocked_count: usize,
    pub critical_path_count: usize,
    pub high_impact_count: usize,
    /// Blocking cycles, one sorted ID list per strongly connected component.
    pub cycles: Vec<Vec<String>>,
    pub fingerprint: String,
    pub content_hash: String,
}

/// Run a full triage pass over `items`.
#[must_use]
#[instrument(skip_all, fields(items = items.len()))]
pub fn compute_triage(
    items: &[WorkItem],
    analytics: &dyn GraphAnalytics,
    config: &TriageConfig,
) -> TriageReport {
    let fingerprint = structural_fingerprint(items);
    let graph = DependencyGraph::from_items(items);

    let cycles = find_cycles(&graph);
    if !cycles.is_empty() {
        warn!(
            cycles = cycles.len(),
            "blocking cycles found; depths inside them are partial"
        );
    }

    let page_rank = analytics.pagerank(&graph);
    let betweenness = analytics.betweenness(&graph);
    let degree = analytics.degree(&graph);
    let unblock = unblock_counts(&graph);
    let depth = depths(&graph);

    let mut metrics: HashMap<String, ItemMetrics> = HashMap::with_capacity(graph.node_count());
    for item in items {
        let Some(idx) = graph.node_index(&item.id) else {
            continue;
        };
        if metrics.contains_key(&item.id) {
            continue;
        }
        let id = item.id.as_str();
        let inputs = MetricInputs {
            page_rank: page_rank.get(id).copied().unwrap_or_default(),
            betweenness: betweenness.get(id).copied().unwrap_or_default(),
            in_degree: degree.in_degree.get(id).copied().unwrap_or_default(),
            out_degree: degree.out_degree.get(id).copied().unwrap_or_default(),
            unblock_count: unblock.get(idx.index()).copied().unwrap_or_default(),
            depth: depth.get(idx.index()).copied().unwrap_or_default(),
            priority: item.priority,
        };
        metrics.insert(item.id.clone(), ItemMetrics::from_inputs(&inputs));
    }

    let ids_where = |keep: &dyn Fn(&ItemMetrics) -> bool| -> Vec<String> {
        let mut seen = HashSet::new();
        items
            .iter()
            .filter(|item| seen.insert(item.id.as_str()))
            .filter(|item| metrics.get(&item.id).is_some_and(keep))
            .map(|item| item.id.clone())
            .collect()
    };

    let ready = ids_where(&ItemMetrics::is_ready);
    let blocked = ids_where(&|m| !m.is_ready());
    let critical_path = ids_where(&|m| m.is_critical_path);
    let high_impact = ids_where(&|m| impact_level(m.impact_score) >= config.high_impact_min);

    let mut seen = HashSet::new();
    let ranked: Vec<String> = sort_by_impact(items, &metrics)
        .into_iter()
        .filter(|item| seen.insert(item.id.as_str()))
        .map(|item| item.id.clone())
        .collect();

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        ready = ready.len(),
        critical = critical_path.len(),
        "triage computed"
    );

    TriageReport {
        ready_count: ready.len(),
        blocked_count: blocked.len(),
        critical_path_count: critical_path.len(),
        high_impact_count: high_impact.len(),
        metrics,
        ranked,
        ready,
        blocked,
        critical_path,
        high_impact,
        cycles,
        fingerprint,
        content_hash: graph.content_hash,
    }
}

// ---------------------------------------------------------------------------
// TriageEngine
// ---------------------------------------------------------------------------

/// Stateful wrapper that skips recomputation while the structure is unchanged.
#[derive(Debug)]
pub struct TriageEngine<A: GraphAnalytics> {
    analytics: A,
    config: TriageConfig,
    debouncer: Debouncer,
    last_fingerprint: Option<String>,
    report: TriageReport,
    recomputes: usize,
}

impl<A: GraphAnalytics> TriageEngine<A> {
    #[must_use]
    pub fn new(analytics: A, config: TriageConfig) -> Self {
        let debouncer = Debouncer::new(config.debounce);
        Self {
            analytics,
            config,
            debouncer,
            last_fingerprint: None,
            report: TriageReport::default(),
            recomputes: 0,
        }
    }

    /// Latest report; empty until the first computation.
    #[must_use]
    pub const fn report(&self) -> &TriageReport {
        &self.report
    }

    /// Number of full triage passes run so far.
    #[must_use]
    pub const fn recompute_count(&self) -> usize {
        self.recomputes
    }

    #[must_use]
    pub const fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Whether a debounced recomputation is waiting.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Recompute now if the structure changed since the last pass.
    pub fn refresh(&mut self, items: &[WorkItem]) -> &TriageReport {
        let fingerprint = structural_fingerprint(items);
        if self.last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            debug!("fingerprint unchanged, reusing triage report");
        } else {
            self.recompute(items, fingerprint);
        }
        &self.report
    }

    /// Record that `items` may have changed. Arms the debouncer and returns
    /// `true` when the structure differs from the last computed snapshot.
    pub fn notify(&mut self, items: &[WorkItem], now: Instant) -> bool {
        let fingerprint = structural_fingerprint(items);
        if self.last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            self.debouncer.cancel();
            return false;
        }
        self.debouncer.request(now);
        true
    }

    /// Recompute when the debounce window has elapsed. Returns the fresh
    /// report, or `None` when nothing was due.
    pub fn poll(&mut self, items: &[WorkItem], now: Instant) -> Option<&TriageReport> {
        if !self.debouncer.take_due(now) {
            return None;
        }
        let fingerprint = structural_fingerprint(items);
        if self.last_fingerprint.as_deref() != Some(fingerprint.as_str()) {
            self.recompute(items, fingerprint);
        }
        Some(&self.report)
    }

    fn recompute(&mut self, items: &[WorkItem], fingerprint: String) {
        self.report = compute_triage(items, &self.analytics, &self.config);
        self.last_fingerprint = Some(fingerprint);
        self.recomputes += 1;
        info!(
            recomputes = self.recomputes,
            items = items.len(),
            "triage recomputed"
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
