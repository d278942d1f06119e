//! Configuration management for simulation parameters.
//!
//! Strongly-typed structures mapping to `config.toml`. Command line flags
//! override whatever the file sets.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults)
//! 3. Command line flags (override both)
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [simulation]
//! runs = 100
//! steps = 1000
//! scheme = "random_async_grouped"
//! seed = 42
//!
//! [defaults]
//! max_state = 3
//!
//! [output]
//! mode = "summary"
//! path = "trace.txt"
//! ```

use regsim_data::{OutputMode, UpdateScheme};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How many runs to perform and how each one advances.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub runs: usize,
    pub steps: usize,
    pub scheme: UpdateScheme,
    /// Base seed; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Distribute runs over the rayon thread pool.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            steps: 1000,
            scheme: UpdateScheme::RandomAsyncGrouped,
            seed: None,
            parallel: false,
        }
    }
}

/// Values used when a model row leaves a column blank.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DefaultsConfig {
    pub max_state: u32,
    pub spontaneous_activation: Option<u32>,
    pub spontaneous_inhibition: Option<u32>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_state: 3,
            spontaneous_activation: Some(2),
            spontaneous_inhibition: Some(2),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub mode: OutputMode,
    pub path: PathBuf,
    /// Also write the frequency summary as JSON.
    pub summary_json: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::Full,
            path: PathBuf::from("trace.txt"),
            summary_json: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Upper bound on truth-table rows enumerated for a single element.
    pub max_truth_table_rows: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_truth_table_rows: 65_536,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub defaults: DefaultsConfig,
    pub output: OutputConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.simulation.runs > 0, "Number of runs must be positive");
        anyhow::ensure!(self.simulation.steps > 0, "Number of steps must be positive");
        anyhow::ensure!(
            self.defaults.max_state >= 2,
            "Default max_state must be at least 2"
        );
        anyhow::ensure!(
            self.export.max_truth_table_rows > 0,
            "max_truth_table_rows must be positive"
        );
        Ok(())
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }
}
