#![forbid(unsafe_code)]
//! plank-core library.
//!
//! Shared vocabulary for the query and triage crates: the [`model::item::WorkItem`]
//! snapshot type, the four-level [`model::priority::Priority`] scale, project
//! configuration, and machine-readable error codes.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for I/O-facing return types; typed
//!   errors (`thiserror`) for values callers are expected to match on.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod model;
