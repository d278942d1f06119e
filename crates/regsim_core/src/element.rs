//! Network elements and their state-transition rule.
//!
//! Scoring is pure (see [`crate::expression`]); everything mutable an
//! element carries between updates lives in [`DelayState`], which only
//! [`Element::apply`] touches.

use crate::definition::ElementDefinition;
use crate::error::{Result, SimError};
use crate::expression::{Expr, Snapshot};
use regsim_data::SpontaneousDelays;
use std::collections::BTreeSet;

/// Direction of a level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rising,
    Falling,
}

/// Position in the transition delay table for a move out of `level`.
///
/// The table holds `2*(max_state-1)` entries: the rising transitions
/// `0->1, 1->2, ...` in level order, then the falling transitions
/// `..., 2->1, 1->0`. Rising out of `level` uses entry `level`; falling out
/// of `level` uses entry `2*(max_state-1) - level`.
///
/// Returns `None` when no such transition exists (rising out of the top
/// level, falling out of level 0, or a level above the top).
#[must_use]
pub fn transition_index(direction: Direction, level: u32, max_state: u32) -> Option<usize> {
    let top = max_state.checked_sub(1)?;
    match direction {
        Direction::Rising if level < top => Some(level as usize),
        Direction::Falling if level > 0 && level <= top => Some((2 * top - level) as usize),
        _ => None,
    }
}

/// What drives a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Regulator scores; gated by the per-transition delay table.
    Regulated,
    /// Drift with no opposing pressure; gated by a spontaneous delay.
    Spontaneous,
}

/// The move the transition rule asks for, before delays are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Hold,
    Rise(Trigger),
    Fall(Trigger),
}

/// Which regulator sides an element has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegulatorKind {
    ActivatorsOnly,
    InhibitorsOnly,
    Both,
    Neither,
}

impl RegulatorKind {
    #[must_use]
    pub fn of(has_activators: bool, has_inhibitors: bool) -> Self {
        match (has_activators, has_inhibitors) {
            (true, false) => Self::ActivatorsOnly,
            (false, true) => Self::InhibitorsOnly,
            (true, true) => Self::Both,
            (false, false) => Self::Neither,
        }
    }
}

/// Core transition rule: the move an element at `level` makes given its
/// activator and inhibitor scores.
///
/// Spontaneous moves are only requested when the matching delay is
/// configured; otherwise the element holds.
#[must_use]
pub fn decide(
    kind: RegulatorKind,
    act: u32,
    inh: u32,
    level: u32,
    max_state: u32,
    spontaneous: SpontaneousDelays,
) -> Move {
    let top = max_state.saturating_sub(1);
    let decay = if spontaneous.inhibition.is_some() {
        Move::Fall(Trigger::Spontaneous)
    } else {
        Move::Hold
    };
    let drift_up = if spontaneous.activation.is_some() {
        Move::Rise(Trigger::Spontaneous)
    } else {
        Move::Hold
    };

    match kind {
        RegulatorKind::ActivatorsOnly => {
            if act > 0 {
                if level < top {
                    Move::Rise(Trigger::Regulated)
                } else {
                    Move::Hold
                }
            } else if level > 0 {
                decay
            } else {
                Move::Hold
            }
        }
        RegulatorKind::InhibitorsOnly => {
            if inh > 0 {
                if level > 0 {
                    Move::Fall(Trigger::Regulated)
                } else {
                    Move::Hold
                }
            } else if level < top {
                drift_up
            } else {
                Move::Hold
            }
        }
        RegulatorKind::Both => {
            if act > inh {
                if level < top {
                    Move::Rise(Trigger::Regulated)
                } else {
                    Move::Hold
                }
            } else if level == 0 {
                Move::Hold
            } else if act == inh {
                decay
            } else {
                Move::Fall(Trigger::Regulated)
            }
        }
        RegulatorKind::Neither => Move::Hold,
    }
}

/// Result of one element update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No move was requested.
    Held,
    /// A move was requested but its delay has not elapsed yet.
    Delayed,
    /// The value changed.
    Fired,
}

/// Live delay counters of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayState {
    pub transition: Vec<u32>,
    pub spontaneous_activation: u32,
    pub spontaneous_inhibition: u32,
}

impl DelayState {
    #[must_use]
    pub fn new(transitions: usize) -> Self {
        Self {
            transition: vec![0; transitions],
            spontaneous_activation: 0,
            spontaneous_inhibition: 0,
        }
    }

    pub fn reset(&mut self) {
        self.transition.iter_mut().for_each(|c| *c = 0);
        self.spontaneous_activation = 0;
        self.spontaneous_inhibition = 0;
    }
}

/// Counts qualifying updates against `threshold`; true once the move may fire.
/// The counter is cleared when it fires.
fn gate(counter: &mut u32, threshold: u32) -> bool {
    if *counter < threshold {
        *counter += 1;
        false
    } else {
        *counter = 0;
        true
    }
}

/// Values of an element's regulators, parallel to its regulator names.
pub struct RegulatorSnapshot<'a> {
    names: &'a [String],
    values: &'a [u32],
}

impl<'a> RegulatorSnapshot<'a> {
    #[must_use]
    pub fn new(names: &'a [String], values: &'a [u32]) -> Self {
        Self { names, values }
    }
}

impl Snapshot for RegulatorSnapshot<'_> {
    fn value(&self, name: &str) -> Option<u32> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i).copied())
    }
}

/// One node of the regulatory network.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    max_state: u32,
    value: u32,
    activators: Option<Expr>,
    inhibitors: Option<Expr>,
    regulators: Vec<String>,
    delays: Vec<u32>,
    spontaneous: SpontaneousDelays,
    state: DelayState,
}

impl Element {
    /// Builds an element from a validated definition. The value starts at 0
    /// until the network resets it.
    pub fn new(def: &ElementDefinition) -> Result<Self> {
        let transitions = 2 * def.max_state.saturating_sub(1) as usize;
        if def.max_state < 2 {
            return Err(SimError::config(format!(
                "max_state must be at least 2, got {}",
                def.max_state
            )));
        }
        if def.delays.len() != transitions {
            return Err(SimError::config(format!(
                "expected {transitions} transition delays, got {}",
                def.delays.len()
            )));
        }
        Ok(Self {
            name: def.name.clone(),
            max_state: def.max_state,
            value: 0,
            regulators: regulator_names(
                &def.name,
                def.activators.as_ref(),
                def.inhibitors.as_ref(),
            ),
            activators: def.activators.clone(),
            inhibitors: def.inhibitors.clone(),
            delays: def.delays.clone(),
            spontaneous: def.spontaneous,
            state: DelayState::new(transitions),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_state(&self) -> u32 {
        self.max_state
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn set_value(&mut self, value: u32) {
        self.value = value;
    }

    pub fn activators(&self) -> Option<&Expr> {
        self.activators.as_ref()
    }

    pub fn inhibitors(&self) -> Option<&Expr> {
        self.inhibitors.as_ref()
    }

    pub fn kind(&self) -> RegulatorKind {
        RegulatorKind::of(self.activators.is_some(), self.inhibitors.is_some())
    }

    pub fn has_regulators(&self) -> bool {
        self.kind() != RegulatorKind::Neither
    }

    /// Names read on every update: activators, then inhibitors not already
    /// listed, then the element itself.
    pub fn regulators(&self) -> &[String] {
        &self.regulators
    }

    pub fn delay_state(&self) -> &DelayState {
        &self.state
    }

    /// Restores the value and clears every delay counter.
    pub fn reset(&mut self, value: u32) {
        self.value = value;
        self.state.reset();
    }

    /// Activator and inhibitor scores for the given regulator values.
    pub fn scores<S: Snapshot + ?Sized>(&self, snapshot: &S) -> Result<(u32, u32)> {
        let act = match &self.activators {
            Some(expr) => expr
                .score(snapshot, self.max_state)
                .map_err(|e| e.with_context("activators"))?,
            None => 0,
        };
        let inh = match &self.inhibitors {
            Some(expr) => expr
                .score(snapshot, self.max_state)
                .map_err(|e| e.with_context("inhibitors"))?,
            None => 0,
        };
        Ok((act, inh))
    }

    /// Updates the element from its regulators' values, given in
    /// [`Element::regulators`] order.
    pub fn update(&mut self, values: &[u32]) -> Result<StepOutcome> {
        let (act, inh) = self.scores(&RegulatorSnapshot::new(&self.regulators, values))?;
        Ok(self.apply(act, inh))
    }

    /// Applies the transition rule for precomputed scores, honouring delays.
    pub fn apply(&mut self, act: u32, inh: u32) -> StepOutcome {
        let level = self.value;
        let top = self.max_state - 1;
        let mv = decide(self.kind(), act, inh, level, self.max_state, self.spontaneous);

        let fired = match mv {
            Move::Hold => return StepOutcome::Held,
            Move::Rise(Trigger::Regulated) | Move::Fall(Trigger::Regulated) => {
                let direction = if matches!(mv, Move::Rise(_)) {
                    Direction::Rising
                } else {
                    Direction::Falling
                };
                match transition_index(direction, level, self.max_state) {
                    Some(i) => gate(&mut self.state.transition[i], self.delays[i]),
                    None => return StepOutcome::Held,
                }
            }
            Move::Rise(Trigger::Spontaneous) => gate(
                &mut self.state.spontaneous_activation,
                self.spontaneous.activation.unwrap_or(0),
            ),
            Move::Fall(Trigger::Spontaneous) => gate(
                &mut self.state.spontaneous_inhibition,
                self.spontaneous.inhibition.unwrap_or(0),
            ),
        };

        if !fired {
            return StepOutcome::Delayed;
        }
        self.value = step_level(level, mv).min(top);
        StepOutcome::Fired
    }

    /// The value the rule would move to from `level` if every delay had
    /// already elapsed. Counters are untouched.
    pub fn next_value_ignoring_delays(&self, level: u32, act: u32, inh: u32) -> u32 {
        let mv = decide(self.kind(), act, inh, level, self.max_state, self.spontaneous);
        step_level(level, mv).min(self.max_state - 1)
    }
}

fn step_level(level: u32, mv: Move) -> u32 {
    match mv {
        Move::Hold => level,
        Move::Rise(_) => level.saturating_add(1),
        Move::Fall(_) => level.saturating_sub(1),
    }
}

fn regulator_names(name: &str, activators: Option<&Expr>, inhibitors: Option<&Expr>) -> Vec<String> {
    let act: BTreeSet<String> = activators.map(Expr::names).unwrap_or_default();
    let inh: BTreeSet<String> = inhibitors.map(Expr::names).unwrap_or_default();

    let mut names: Vec<String> = act.iter().filter(|n| *n != name).cloned().collect();
    names.extend(
        inh.iter()
            .filter(|n| *n != name && !act.contains(*n))
            .cloned(),
    );
    names.push(name.to_string());
    names
}
