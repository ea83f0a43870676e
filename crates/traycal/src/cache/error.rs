use thiserror::Error;

use traycal_core::source::SourceError;

/// Errors that can occur while filling the event cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Calendar source failed: {0}")]
    Source(#[from] SourceError),
    #[error("Month fetch timed out after {0}s")]
    Timeout(u64),
    #[error("Event cache must be created inside a tokio runtime")]
    NoRuntime,
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
