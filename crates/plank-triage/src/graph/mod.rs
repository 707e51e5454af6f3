//! Dependency graph module for triage computation.
//!
//! ## Pipeline
//!
//! ```text
//! &[WorkItem]
//!        ↓  build::DependencyGraph::from_items()
//! DependencyGraph (DiGraph, may contain cycles)
//!        ↓  analytics::GraphAnalytics + metrics
//! per-item metrics
//! ```
//!
//! ## Cache Invalidation
//!
//! [`DependencyGraph::content_hash`] is a BLAKE3 hash of the edge set.

pub mod build;
pub mod cycles;

pub use build::DependencyGraph;
pub use cycles::find_cycles;
