//! Error types for resync-netcode

use thiserror::Error;

/// Netcode error type
///
/// Divergence is never an error: it is reported through the diff verdict.
#[derive(Debug, Error)]
pub enum Error {
    /// Server and client snapshots belong to different ticks
    #[error("Snapshots are not aligned: server input {server}, client input {client}")]
    InputMismatch { server: u64, client: u64 },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] ron::error::SpannedError),
}

/// Result type for netcode operations
pub type Result<T> = std::result::Result<T, Error>;
