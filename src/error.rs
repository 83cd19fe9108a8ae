//! Error types for the RRR index.

use thiserror::Error;

/// Error variants for index construction and queries.
#[derive(Debug, Error)]
pub enum Error {
    /// An index was provided that is out of the structure's bounds.
    #[error("index out of range: {0}")]
    IndexOutOfBounds(u64),

    /// A block size outside the supported range was requested.
    #[error("invalid block size: {0} (must be 1..=64)")]
    InvalidBlockSize(u8),
}

/// A specialized Result type for RRR operations.
pub type Result<T> = std::result::Result<T, Error>;
