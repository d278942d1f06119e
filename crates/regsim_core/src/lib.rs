//! # Regsim Core
//!
//! The simulation engine for discrete multi-level regulatory networks.
//!
//! This crate contains:
//! - The regulator expression parser and scorer
//! - Elements with their delay-aware state-transition rule
//! - The network model, update disciplines and run orchestration
//! - Truth-table rule export
//! - Configuration, metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use regsim_core::config::DefaultsConfig;
//! use regsim_core::metrics::Metrics;
//! use regsim_core::network::Network;
//! use regsim_core::simulation::{run_simulation, SimulationParams};
//! use regsim_data::{Cell, ElementRow, UpdateScheme};
//!
//! let mut a = ElementRow::new("A", "", "");
//! a.initial = Some(Cell::Int(1));
//! let mut b = ElementRow::new("B", "A", "");
//! b.initial = Some(Cell::Int(0));
//!
//! let mut network = Network::from_rows(&[a, b], &DefaultsConfig::default()).unwrap();
//! let params = SimulationParams {
//!     scheme: UpdateScheme::Synchronous,
//!     runs: 1,
//!     steps: 2,
//!     seed: Some(42),
//! };
//! let summary = run_simulation(&mut network, &params, &mut (), &Metrics::new()).unwrap();
//! assert_eq!(summary.entry("B").unwrap().sums, vec![0, 1, 2]);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Row validation into element definitions
pub mod definition;
/// Elements and the state-transition rule
pub mod element;
pub mod error;
/// Truth-table rule export
pub mod export;
/// Regulator expression parsing and scoring
pub mod expression;
/// Performance metrics collection and logging
pub mod metrics;
/// The simulation model
pub mod network;
pub mod registry;
/// Update disciplines
pub mod scheduler;
/// Run orchestration
pub mod simulation;

pub use error::{Result, SimError};
pub use expression::{Expr, Snapshot};
pub use metrics::{init_logging, Metrics};
pub use network::Network;
pub use scheduler::UpdatePolicy;
pub use simulation::{run_simulation, RunObserver, RunTrace, SimulationParams};
