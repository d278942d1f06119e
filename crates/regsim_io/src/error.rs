//! Error types for regsim_io crate.
//!
//! Covers model loading, trace writing and summary reading. Engine failures
//! surfacing during a load or write are carried as [`IoError::Sim`].

use regsim_core::SimError;
use thiserror::Error;

/// Main error type for regsim_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed model or summary content
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Engine errors raised while building or running a model
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for regsim_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    /// Creates a new serialization error.
    #[must_use]
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates a new validation error.
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a new not found error.
    #[must_use]
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound(resource.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IoError::validation("missing 'Frequency Summary:' section");
        assert_eq!(
            err.to_string(),
            "Validation error: missing 'Frequency Summary:' section"
        );
    }

    #[test]
    fn test_error_context() {
        let err = IoError::not_found("model.toml").with_context("loading model");
        assert!(err.to_string().contains("loading model"));
    }

    #[test]
    fn test_sim_error_is_transparent() {
        let err: IoError = SimError::lookup("Ras").into();
        assert_eq!(err.to_string(), "Lookup error: no element named 'Ras'");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: IoError = io_err.into();
        assert!(matches!(err, IoError::FileSystem(_)));
    }
}
