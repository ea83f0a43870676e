use thiserror::Error;

/// Errors that can occur when parsing calendar values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid color format: {0}")]
    InvalidColor(String),
    #[error("Invalid month: {0} (expected YYYY-MM)")]
    InvalidMonth(String),
}
