//! Typed errors for the anonymizer library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Boxed error produced by an injected collaborator (detector, model).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during anonymization.
#[derive(Debug, Error)]
pub enum AnonymizerError {
    /// Detection threshold outside `(0, 1]`
    #[error("invalid threshold {0}: must be in (0, 1]")]
    InvalidThreshold(f32),

    /// Entity detector failed on a fragment
    #[error("detection error: {0}")]
    Detection(#[source] BoxError),

    /// Detector returned a span that does not fit its fragment
    #[error("invalid span {start}..{end} for fragment of {len} bytes")]
    InvalidSpan { start: usize, end: usize, len: usize },

    /// Detection gate was closed while waiting for a permit
    #[error("detection gate closed")]
    GateClosed,

    /// Blocking task panicked or was aborted
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Operation was cancelled
    #[error("operation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("config error: {reason}")]
    Config { reason: String },
}

impl AnonymizerError {
    /// Wrap a collaborator error as a detection failure.
    pub fn detection(err: impl Into<BoxError>) -> Self {
        Self::Detection(err.into())
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

/// Result type alias for anonymizer operations.
pub type Result<T> = std::result::Result<T, AnonymizerError>;
