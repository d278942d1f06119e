use serde::{Deserialize, Serialize};

/// Value an element takes at the start of every run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialValue {
    /// A fixed level.
    Fixed(u32),
    /// Drawn per run from `{0, max_state/2, max_state-1}`.
    Random,
}

/// Delays for drift toward a level in the absence of regulator pressure.
///
/// `None` means the element never drifts in that direction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpontaneousDelays {
    pub activation: Option<u32>,
    pub inhibition: Option<u32>,
}

/// Forced override of an element's value at one step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    pub step: usize,
    pub value: u32,
}
