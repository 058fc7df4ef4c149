//! Resync Netcode - Snapshot reconciliation for rollback netcode
//!
//! When an authoritative server snapshot arrives, the client compares it with
//! the snapshot it predicted for the same input tick and picks a correction:
//!
//! - **In sync**: prediction matched, nothing to do
//! - **Patch**: only variables flagged `skip_rewinding` differ; apply the
//!   recovery snapshot in place
//! - **Rewind**: a hard divergence; discard predicted ticks and resimulate
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │    Server    │   │    Client    │
//! │   Snapshot   │   │   Snapshot   │
//! └──────┬───────┘   └──────┬───────┘
//!        └────────┬─────────┘
//!                 ▼
//!        ┌──────────────────┐    NodeRegistry
//!        │ compare_snapshots│◀── ValueComparator
//!        │ compare_node_vars│    Stringifier
//!        └────────┬─────────┘
//!                 ▼
//!        ┌──────────────────┐
//!        │    Reconciler    │──▶ Correction
//!        └──────────────────┘
//! ```
//!
//! Comparisons run in [`DiffMode::Fast`] (stop at the first hard divergence)
//! or [`DiffMode::Full`] (scan everything for diagnostics). Both modes always
//! return the same verdict.

mod config;
mod diff;
mod error;
mod reconciliation;

pub use config::{DiffMode, DiffOptions, ReconcileConfig};
pub use diff::{compare_node_vars, compare_snapshots, DiffContext, DiffReport};
pub use error::{Error, Result};
pub use reconciliation::{Correction, ReconcileStats, Reconciler};
