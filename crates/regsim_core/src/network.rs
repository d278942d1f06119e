//! The simulation model: elements plus per-run metadata (initial values,
//! toggles, update groups) and the single-step driver.

use crate::config::DefaultsConfig;
use crate::definition::ElementDefinition;
use crate::element::Element;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::registry::Registry;
use crate::scheduler::UpdatePolicy;
use rand::{Rng, RngCore};
use regsim_data::{ElementRow, InitialValue, Toggle};

#[derive(Debug, Clone)]
pub struct Network {
    registry: Registry,
    initial: Vec<InitialValue>,
    /// Ids of elements with at least one regulator side, in registration order.
    update_list: Vec<usize>,
    toggles: Vec<Vec<Toggle>>,
    groups: Vec<Option<String>>,
}

impl Network {
    pub fn from_definitions(definitions: Vec<ElementDefinition>) -> Result<Self> {
        let mut elements = Vec::with_capacity(definitions.len());
        let mut initial = Vec::with_capacity(definitions.len());
        let mut toggles = Vec::with_capacity(definitions.len());
        let mut groups = Vec::with_capacity(definitions.len());
        for def in definitions {
            let element = Element::new(&def)
                .map_err(|e| e.with_context(format!("element '{}'", def.name)))?;
            elements.push(element);
            initial.push(def.initial);
            toggles.push(def.toggles);
            groups.push(def.update_group);
        }

        let registry = Registry::new(elements)?;
        let update_list = registry
            .elements()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_regulators())
            .map(|(id, _)| id)
            .collect();

        let mut network = Self {
            registry,
            initial,
            update_list,
            toggles,
            groups,
        };
        // Fixed initial values are visible before the first run.
        for id in 0..network.len() {
            if let InitialValue::Fixed(v) = network.initial[id] {
                network.registry.element_mut(id).reset(v);
            }
        }
        Ok(network)
    }

    /// Validates rows and builds the network in row order.
    pub fn from_rows(rows: &[ElementRow], defaults: &DefaultsConfig) -> Result<Self> {
        let definitions = rows
            .iter()
            .map(|row| ElementDefinition::from_row(row, defaults))
            .collect::<Result<Vec<_>>>()?;
        Self::from_definitions(definitions)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn element(&self, id: usize) -> &Element {
        self.registry.element(id)
    }

    pub fn update_list(&self) -> &[usize] {
        &self.update_list
    }

    pub fn group(&self, id: usize) -> Option<&str> {
        self.groups[id].as_deref()
    }

    pub fn initial(&self, id: usize) -> InitialValue {
        self.initial[id]
    }

    pub fn values(&self) -> Vec<u32> {
        self.registry.elements().iter().map(Element::value).collect()
    }

    /// Restores every element to its initial value with cleared delay
    /// counters. Random initial values are drawn from `rng`.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for id in 0..self.len() {
            let max_state = self.registry.element(id).max_state();
            let value = match self.initial[id] {
                InitialValue::Fixed(v) => v,
                InitialValue::Random => match rng.gen_range(0..3) {
                    0 => 0,
                    1 => max_state / 2,
                    _ => max_state - 1,
                },
            };
            self.registry.element_mut(id).reset(value);
        }
    }

    /// Forced value for an element at a step; the last matching toggle wins.
    pub fn toggle_at(&self, id: usize, step: usize) -> Option<u32> {
        self.toggles[id]
            .iter()
            .rev()
            .find(|t| t.step == step)
            .map(|t| t.value)
    }

    /// Applies every toggle scheduled for `step` and returns how many fired.
    pub fn apply_toggles(&mut self, step: usize) -> usize {
        let mut applied = 0;
        for id in 0..self.len() {
            if let Some(value) = self.toggle_at(id, step) {
                self.registry.set_value(id, value);
                applied += 1;
            }
        }
        applied
    }

    /// Advances the network by one step: `policy` picks the elements and they
    /// update one after another, each seeing the writes made before it.
    pub fn step(
        &mut self,
        policy: &dyn UpdatePolicy,
        rng: &mut dyn RngCore,
        selected: &mut Vec<usize>,
        metrics: &Metrics,
    ) -> Result<()> {
        selected.clear();
        policy.select(self, rng, selected);
        for &id in selected.iter() {
            let outcome = self.registry.update(id)?;
            metrics.record_update(outcome);
        }
        metrics.record_step();
        Ok(())
    }
}
