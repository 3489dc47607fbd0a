use thiserror::Error;

/// Main error type for catalog operations
#[derive(Error, Debug)]
pub enum AudexError {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Duplicate record: \"{title}\" by {artist}")]
    DuplicateRecord { title: String, artist: String },

    #[error("Record not found: \"{title}\" by {artist}")]
    RecordNotFound { title: String, artist: String },

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, AudexError>;

impl AudexError {
    /// Build a duplicate-key error from the offending record's key fields
    pub fn duplicate(title: impl Into<String>, artist: impl Into<String>) -> Self {
        AudexError::DuplicateRecord {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Build a not-found error from the requested key fields
    pub fn not_found(title: impl Into<String>, artist: impl Into<String>) -> Self {
        AudexError::RecordNotFound {
            title: title.into(),
            artist: artist.into(),
        }
    }

    /// Check if this error is an expected condition a caller can continue past
    /// (a skipped import line, a mistyped pattern) rather than a defect
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AudexError::InvalidRecord(_)
                | AudexError::DuplicateRecord { .. }
                | AudexError::RecordNotFound { .. }
                | AudexError::InvalidPattern(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AudexError::duplicate("Imagine", "John Lennon");
        assert_eq!(err.to_string(), "Duplicate record: \"Imagine\" by John Lennon");

        let err = AudexError::InvalidRecord("duration out of range".to_string());
        assert_eq!(err.to_string(), "Invalid record: duration out of range");
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(AudexError::duplicate("a", "b").is_recoverable());
        assert!(AudexError::not_found("a", "b").is_recoverable());
        assert!(!AudexError::Internal("slot out of bounds".to_string()).is_recoverable());
    }

    #[test]
    fn test_pattern_error_conversion() {
        let err: AudexError = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(matches!(err, AudexError::InvalidPattern(_)));
        assert!(err.is_recoverable());
    }
}
