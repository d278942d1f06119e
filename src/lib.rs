//! # Regsim
//!
//! Discrete multi-level regulatory network simulator.
//!
//! The engine lives in `regsim_core`; this crate wires it to configuration,
//! model files and trace output for the `regsim` binary.

pub mod app;

pub use regsim_core::{init_logging, Metrics, Network, SimError};
