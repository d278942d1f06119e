//! Export of element rules as Boolean sum-of-products expressions.
//!
//! Each element with regulators is expanded into a truth table over every
//! combination of its regulators' levels (delays ignored), and each bit of
//! the next value becomes one Boolean function. Multi-level elements are
//! encoded in `ceil(log2(max_state))` bits named `X_0` (least significant)
//! upward; two-level elements keep their bare name.

use crate::element::{Element, RegulatorSnapshot};
use crate::error::{Result, SimError};
use crate::network::Network;
use std::io::Write;

/// Bits needed to encode levels `0..max_state`, at least one.
#[must_use]
pub fn bit_length(max_state: u32) -> u32 {
    (u32::BITS - max_state.saturating_sub(1).leading_zeros()).max(1)
}

/// One row of an element's truth table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthRow {
    /// Regulator levels, in the element's regulator order.
    pub inputs: Vec<u32>,
    pub next: u32,
}

/// Enumerates every regulator combination of element `id`, first regulator
/// most significant. Fails when the table would exceed `max_rows`.
pub fn truth_table(network: &Network, id: usize, max_rows: usize) -> Result<Vec<TruthRow>> {
    let element = network.element(id);
    let radices = regulator_radices(network, element);

    let rows = radices
        .iter()
        .try_fold(1usize, |acc, &r| acc.checked_mul(r as usize))
        .filter(|&n| n <= max_rows)
        .ok_or_else(|| {
            SimError::config(format!(
                "truth table for '{}' exceeds {max_rows} rows",
                element.name()
            ))
        })?;

    let mut table = Vec::with_capacity(rows);
    let mut inputs = vec![0u32; radices.len()];
    for index in 0..rows {
        let mut rest = index;
        for (slot, &radix) in inputs.iter_mut().zip(&radices).rev() {
            *slot = (rest % radix as usize) as u32;
            rest /= radix as usize;
        }
        let snapshot = RegulatorSnapshot::new(element.regulators(), &inputs);
        let (act, inh) = element
            .scores(&snapshot)
            .map_err(|e| e.with_context(format!("element '{}'", element.name())))?;
        let level = inputs.last().copied().unwrap_or(0);
        table.push(TruthRow {
            inputs: inputs.clone(),
            next: element.next_value_ignoring_delays(level, act, inh),
        });
    }
    Ok(table)
}

fn regulator_radices(network: &Network, element: &Element) -> Vec<u32> {
    element
        .regulators()
        .iter()
        .map(|name| {
            network
                .registry()
                .id(name)
                .map_or(element.max_state(), |id| network.element(id).max_state())
        })
        .collect()
}

fn bit_name(name: &str, bits: u32, bit: u32) -> String {
    if bits > 1 {
        format!("{name}_{bit}")
    } else {
        name.to_string()
    }
}

fn product_term(names: &[String], radices: &[u32], inputs: &[u32]) -> String {
    let mut literals = Vec::new();
    for ((name, &radix), &value) in names.iter().zip(radices).zip(inputs) {
        let bits = bit_length(radix);
        for bit in 0..bits {
            let var = bit_name(name, bits, bit);
            if (value >> bit) & 1 == 1 {
                literals.push(var);
            } else {
                literals.push(format!("!{var}"));
            }
        }
    }
    format!("({})", literals.join("*"))
}

/// The rule block for one element, or `None` when it has no regulators.
pub fn element_rules(network: &Network, id: usize, max_rows: usize) -> Result<Option<String>> {
    let element = network.element(id);
    if !element.has_regulators() {
        return Ok(None);
    }
    let radices = regulator_radices(network, element);
    let table = truth_table(network, id, max_rows)?;
    let bits = bit_length(element.max_state());

    let mut text = String::from("{\n");
    for bit in 0..bits {
        let terms: Vec<String> = table
            .iter()
            .filter(|row| (row.next >> bit) & 1 == 1)
            .map(|row| product_term(element.regulators(), &radices, &row.inputs))
            .collect();
        let rhs = if terms.is_empty() {
            "Const_False".to_string()
        } else {
            terms.join(" + ")
        };
        text.push_str(&format!("{} = {rhs};\n", bit_name(element.name(), bits, bit)));
    }
    text.push_str("}\n");
    Ok(Some(text))
}

/// Writes the rule blocks of every regulated element, in name order.
pub fn write_rules<W: Write>(network: &Network, max_rows: usize, out: &mut W) -> Result<()> {
    let mut written = 0usize;
    for id in network.registry().sorted_ids() {
        if let Some(block) = element_rules(network, id, max_rows)? {
            out.write_all(block.as_bytes())?;
            written += 1;
        }
    }
    tracing::info!(elements = written, "Exported element rules");
    Ok(())
}
