//! Error types for tabletop operations.
//!
//! Interaction handlers never fail: unknown card ids, non-finite coordinates
//! and degenerate pinches are logged and ignored. Errors only surface at the
//! boundaries where a host hands data in or asks for data out.

use thiserror::Error;

/// Result type for tabletop operations.
pub type TableResult<T> = Result<T, TableError>;

/// Errors that can occur at the tabletop's fallible boundaries.
#[derive(Debug, Error)]
pub enum TableError {
    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Frame, config or script serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
