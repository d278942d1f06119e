use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Update discipline used to advance the network by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpdateScheme {
    /// One element, chosen uniformly at random, per step.
    RandomAsync,
    /// As `RandomAsync`, but the rest of the chosen element's update group fires too.
    #[default]
    RandomAsyncGrouped,
    /// Every element, in registration order, per step.
    Synchronous,
}

impl fmt::Display for UpdateScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpdateScheme::RandomAsync => "random_async",
            UpdateScheme::RandomAsyncGrouped => "random_async_grouped",
            UpdateScheme::Synchronous => "synchronous",
        };
        f.write_str(s)
    }
}

impl FromStr for UpdateScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random_async" | "ra_single" => Ok(UpdateScheme::RandomAsync),
            "random_async_grouped" | "ra" => Ok(UpdateScheme::RandomAsyncGrouped),
            "synchronous" | "sync" => Ok(UpdateScheme::Synchronous),
            other => Err(format!("unknown update scheme '{other}'")),
        }
    }
}

/// Layout of the trace file written after a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Every run's trace followed by the frequency summary.
    #[default]
    Full,
    /// One line per step with all element values, no summary.
    Transposed,
    /// Frequency summary only.
    Summary,
    /// A single run expanded to Boolean bit variables.
    Checker,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full" | "1" => Ok(OutputMode::Full),
            "transposed" | "2" => Ok(OutputMode::Transposed),
            "summary" | "3" => Ok(OutputMode::Summary),
            "checker" => Ok(OutputMode::Checker),
            other => Err(format!("unknown output mode '{other}'")),
        }
    }
}
