//! Error types for resync-core

use crate::NodeId;
use thiserror::Error;

/// Core error type
///
/// Only registry mutation can fail; comparing snapshots never does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Duplicate node: {0}")]
    DuplicateNode(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
