#![forbid(unsafe_code)]
//! plank-triage library.
//!
//! Builds a dependency graph over a work-item snapshot and scores every item
//! by how much work it holds up: PageRank, betweenness, degree, transitive
//! unblock count, blocker depth, a critical-path flag and a 0-100 impact
//! score.
//!
//! # Conventions
//!
//! - **Errors**: Triage has no error channel. Missing or odd data falls back
//!   to neutral values (unknown priority → medium, dangling links dropped).
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Example
//!
//! ```
//! use plank_core::model::item::WorkItem;
//! use plank_triage::{NativeAnalytics, TriageConfig, compute_triage};
//!
//! let items = vec![
//!     WorkItem::new("a", "Schema").with_blocking(["b"]),
//!     WorkItem::new("b", "Migration"),
//! ];
//! let report = compute_triage(&items, &NativeAnalytics::default(), &TriageConfig::default());
//! assert_eq!(report.ready, ["a"]);
//! assert_eq!(report.metrics["a"].unblock_count, 1);
//! ```

pub mod analytics;
pub mod engine;
pub mod graph;
pub mod metrics;
pub mod rank;
pub mod schedule;

pub use analytics::{GraphAnalytics, NativeAnalytics, PageRankConfig};
pub use engine::{TriageConfig, TriageEngine, TriageReport, compute_triage};
pub use graph::DependencyGraph;
pub use metrics::ItemMetrics;
pub use rank::{ImpactLevel, compare_impact, format_unblock_badge, impact_level, sort_by_impact};
pub use schedule::Debouncer;
