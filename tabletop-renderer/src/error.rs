//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A raster surface could not be allocated.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Encoding the rendered image failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
