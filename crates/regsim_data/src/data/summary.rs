use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cross-run value sums for one element.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    /// Element name.
    pub name: String,
    /// Number of discrete levels of the element.
    pub max_state: u32,
    /// Sum over runs of the element's value, one entry per step `0..=steps`.
    pub sums: Vec<u64>,
}

/// Frequency summary of a simulation: per element, per step, the sum of
/// values across all runs. Entries are ordered by element name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct FrequencySummary {
    /// Number of runs that were summed.
    pub runs: usize,
    /// Number of simulated steps (each entry holds `steps + 1` sums).
    pub steps: usize,
    pub entries: Vec<SummaryEntry>,
}

impl FrequencySummary {
    /// Looks up the entry for an element.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&SummaryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Mean value of every element at the final step.
    ///
    /// Returns an empty map when no runs were summed.
    #[must_use]
    pub fn end_values(&self) -> BTreeMap<String, f64> {
        if self.runs == 0 {
            return BTreeMap::new();
        }
        self.entries
            .iter()
            .map(|e| {
                let last = e.sums.last().copied().unwrap_or(0);
                (e.name.clone(), last as f64 / self.runs as f64)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> FrequencySummary {
        FrequencySummary {
            runs: 4,
            steps: 2,
            entries: vec![
                SummaryEntry {
                    name: "A".into(),
                    max_state: 3,
                    sums: vec![4, 6, 8],
                },
                SummaryEntry {
                    name: "B".into(),
                    max_state: 2,
                    sums: vec![0, 1, 2],
                },
            ],
        }
    }

    #[test]
    fn test_end_values_are_normalised() {
        let end = summary().end_values();
        assert_eq!(end["A"], 2.0);
        assert_eq!(end["B"], 0.5);
    }

    #[test]
    fn test_end_values_without_runs() {
        let mut s = summary();
        s.runs = 0;
        assert!(s.end_values().is_empty());
    }

    #[test]
    fn test_entry_lookup() {
        assert_eq!(summary().entry("B").map(|e| e.max_state), Some(2));
        assert!(summary().entry("C").is_none());
    }
}
