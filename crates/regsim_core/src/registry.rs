use crate::element::{Element, StepOutcome};
use crate::error::{Result, SimError};
use std::collections::BTreeMap;

/// Owns every element of a network and resolves regulator names to ids once.
///
/// Ids are registration order. Name order (used for output) comes from the
/// sorted index.
#[derive(Debug, Clone)]
pub struct Registry {
    elements: Vec<Element>,
    index: BTreeMap<String, usize>,
    regulator_ids: Vec<Vec<usize>>,
}

impl Registry {
    /// Fails on duplicate names and on regulators that name no element.
    pub fn new(elements: Vec<Element>) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (id, element) in elements.iter().enumerate() {
            if index.insert(element.name().to_string(), id).is_some() {
                return Err(SimError::config(format!(
                    "duplicate element name '{}'",
                    element.name()
                )));
            }
        }

        let regulator_ids = elements
            .iter()
            .map(|element| {
                element
                    .regulators()
                    .iter()
                    .map(|name| {
                        index.get(name).copied().ok_or_else(|| {
                            SimError::lookup(name.clone())
                                .with_context(format!("element '{}'", element.name()))
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            elements,
            index,
            regulator_ids,
        })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn element(&self, id: usize) -> &Element {
        &self.elements[id]
    }

    pub fn element_mut(&mut self, id: usize) -> &mut Element {
        &mut self.elements[id]
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn value(&self, id: usize) -> u32 {
        self.elements[id].value()
    }

    pub fn set_value(&mut self, id: usize, value: u32) {
        self.elements[id].set_value(value);
    }

    /// Ids in element-name order.
    pub fn sorted_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.index.values().copied()
    }

    /// Current values of `id`'s regulators, in its regulator order.
    pub fn snapshot(&self, id: usize) -> Vec<u32> {
        self.regulator_ids[id]
            .iter()
            .map(|&r| self.elements[r].value())
            .collect()
    }

    /// Updates one element against the current values of its regulators.
    pub fn update(&mut self, id: usize) -> Result<StepOutcome> {
        let values = self.snapshot(id);
        let element = &mut self.elements[id];
        element
            .update(&values)
            .map_err(|e| e.with_context(format!("element '{}'", element.name())))
    }
}
