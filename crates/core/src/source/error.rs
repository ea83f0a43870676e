use thiserror::Error;

/// Errors a calendar provider can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Credentials are missing or were rejected. Fatal until re-authorized.
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("IO error: {0}")]
    Io(String),
    /// A transient fetch failure; the request may be retried.
    #[error("Provider error: {0}")]
    Provider(String),
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::Io(err.to_string())
    }
}

/// Result type for calendar source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_display() {
        let error = SourceError::Auth("token expired".to_string());
        assert_eq!(error.to_string(), "Authentication failed: token expired");
    }

    #[test]
    fn test_provider_display() {
        let error = SourceError::Provider("503 from upstream".to_string());
        assert_eq!(error.to_string(), "Provider error: 503 from upstream");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "events.json");
        assert_eq!(
            SourceError::from(io),
            SourceError::Io("events.json".to_string())
        );
    }
}
