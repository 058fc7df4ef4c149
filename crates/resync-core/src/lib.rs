//! Resync Core - Data model for snapshot reconciliation
//!
//! This crate provides the types shared by every part of the resync engine:
//! - Dynamic value types (`Value`, `ValueMap`)
//! - Node identifiers and registry descriptors (`NodeId`, `NodeDescriptor`)
//! - Per-tick snapshots of synchronized variables (`Snapshot`, `Var`)
//! - The injected comparison and rendering contracts (`ValueComparator`,
//!   `Stringifier`) with default implementations
//!
//! Reconciliation itself lives in `resync-netcode`.

mod compare;
mod error;
mod identity;
mod node;
mod snapshot;
mod value;

pub use compare::{ApproxComparator, DisplayStringifier, Stringifier, ValueComparator, DEFAULT_EPSILON};
pub use error::{Error, Result};
pub use identity::NodeId;
pub use node::{NodeDescriptor, NodeRegistry, NodeTable, VarDescriptor};
pub use snapshot::{Snapshot, Var, RECOVERY_INPUT_ID};
pub use value::{Value, ValueMap};
