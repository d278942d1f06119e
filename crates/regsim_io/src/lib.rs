//! # Regsim IO
//!
//! File-facing collaborators of the regsim engine.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - Model definition loading (TOML, JSON)
//! - Trace and frequency-summary writers
//! - Summary reading and scoring against expected end values

/// Error types and result aliases for I/O operations
pub mod error;
/// Model definition loading
pub mod loader;
/// Validated serialization helpers for JSON and TOML
pub mod serialization;
/// Frequency summary reading and scoring
pub mod summary;
/// Trace writers for every output mode
pub mod trace;

pub use error::{IoError, Result};
pub use loader::{load_model, ModelFormat};
pub use serialization::{from_json, from_toml, read_json_file, to_json_pretty, write_json_file};
pub use summary::{read_expected, read_summary, score_against_expected, ScoreReport};
pub use trace::TraceWriter;
