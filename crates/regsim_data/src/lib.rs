//! Core data structures for the regsim simulator.
//!
//! These types carry no simulation logic. They describe model rows as they
//! arrive from a definition file, the resolved per-element settings derived
//! from them, and the aggregate artifacts a simulation produces.

pub mod data;

pub use data::row::{Cell, ElementRow, ModelFile};
pub use data::schedule::{OutputMode, UpdateScheme};
pub use data::settings::{InitialValue, SpontaneousDelays, Toggle};
pub use data::summary::{FrequencySummary, SummaryEntry};
