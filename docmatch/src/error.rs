// docmatch/src/error.rs
//
// Error taxonomy. Only `CompareError` escapes a batch; extraction and
// pattern errors are per-item and never abort sibling work.

use thiserror::Error;

/// Failure of a whole comparison request.
#[derive(Debug, Error)]
pub enum CompareError {
    /// User-correctable input problem. Nothing was computed or persisted.
    #[error("{0}")]
    Validation(String),

    #[error("provider failure: {0}")]
    Provider(#[from] ProviderError),

    #[error("worker task failed: {0}")]
    Worker(String),
}

impl CompareError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<tokio::task::JoinError> for CompareError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Worker(e.to_string())
    }
}

/// Embedding provider or AI detector unavailable / misbehaving.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("embedding provider: {0}")]
    Embedding(String),

    #[error("embedding provider returned {got} vectors for {expected} texts")]
    Shape { expected: usize, got: usize },

    #[error("AI detector: {0}")]
    Detector(String),
}

/// A single document could not be read. Treated as empty text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("capability not available: {0}")]
    Unavailable(&'static str),

    #[error("pdf: {0}")]
    Pdf(String),

    #[error("archive: {0}")]
    Archive(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A user-supplied removal pattern that failed to compile.
#[derive(Debug, Error)]
#[error("invalid pattern {pattern:?}: {reason}")]
pub struct PatternError {
    pub pattern: String,
    pub reason:  String,
}
