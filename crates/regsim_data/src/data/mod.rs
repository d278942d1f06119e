//! Core data structures for the regsim simulator.

pub mod row;
pub mod schedule;
pub mod settings;
pub mod summary;
