//! Error types for sigpad.

use thiserror::Error;

/// Result alias using [`PadError`].
pub type PadResult<T> = Result<T, PadError>;

/// Errors raised by the pad or its host surface.
#[derive(Debug, Error)]
pub enum PadError {
    /// The surface could not provide a 2D drawing context.
    #[error("2D drawing context unavailable")]
    ContextUnavailable,

    /// A surface could not be allocated at the requested size.
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Image encoding failed.
    #[error("Image encoding error: {0}")]
    Encode(String),

    /// Any other failure reported by the host environment.
    #[error("Host error: {0}")]
    Host(String),
}
