//! Error types for the simulation engine.
//!
//! Every failure the engine can report is a model or data bug rather than a
//! transient condition, so nothing here is retried. Errors raised deep in
//! expression scoring are wrapped with the element or row they came from
//! via [`SimError::with_context`].

use thiserror::Error;

/// Main error type for regsim_core operations.
#[derive(Error, Debug)]
pub enum SimError {
    /// Malformed model definition (delays, spontaneous pair, initial value...)
    #[error("Config error: {0}")]
    Config(String),

    /// A referenced element is missing from the registry
    #[error("Lookup error: no element named '{0}'")]
    Lookup(String),

    /// Discrete NOT applied to a value above the max state
    #[error("Range error: cannot negate '{name}' = {value}, max level is {max_level}")]
    Range {
        name: String,
        value: u32,
        max_level: u32,
    },

    /// Malformed regulator expression text
    #[error("Parse error in '{expr}': {reason}")]
    Parse { expr: String, reason: String },

    /// Failure reported by a run observer while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error with the element or row it occurred in
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<SimError>,
    },
}

/// Result type alias for regsim_core operations.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new lookup error for a missing element name.
    #[must_use]
    pub fn lookup<S: Into<String>>(name: S) -> Self {
        Self::Lookup(name.into())
    }

    /// Creates a new parse error for an expression.
    #[must_use]
    pub fn parse<E: Into<String>, R: Into<String>>(expr: E, reason: R) -> Self {
        Self::Parse {
            expr: expr.into(),
            reason: reason.into(),
        }
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The underlying error with every context layer removed.
    #[must_use]
    pub fn root(&self) -> &SimError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }
}
