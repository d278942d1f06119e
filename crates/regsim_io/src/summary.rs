//! Reading written frequency summaries back and scoring them against
//! expected end values.

use crate::error::{IoError, Result};
use crate::loader::ModelFormat;
use crate::serialization::{from_json, from_toml};
use crate::trace::SUMMARY_HEADER;
use regsim_data::{FrequencySummary, SummaryEntry};
use std::collections::BTreeMap;
use std::path::Path;

/// Parses the frequency summary section of a trace.
///
/// The run count comes from the last `Run #n` line before the summary
/// (`n + 1` runs) unless `runs` is given.
pub fn parse_summary(text: &str, runs: Option<usize>) -> Result<FrequencySummary> {
    let mut last_run = None;
    let mut lines = text.lines();
    loop {
        let line = lines
            .next()
            .ok_or_else(|| IoError::validation(format!("missing '{SUMMARY_HEADER}' section")))?
            .trim();
        if line == SUMMARY_HEADER {
            break;
        }
        if let Some(n) = line.strip_prefix("Run #") {
            last_run = n.trim().parse::<usize>().ok();
        }
    }

    let mut entries = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry = parse_entry(line)
            .map_err(|e| e.with_context(format!("summary line {}", offset + 1)))?;
        entries.push(entry);
    }

    let steps = entries.first().map_or(0, |e| e.sums.len().saturating_sub(1));
    if let Some(bad) = entries.iter().find(|e| e.sums.len() != steps + 1) {
        return Err(IoError::validation(format!(
            "'{}' has {} sums, expected {}",
            bad.name,
            bad.sums.len(),
            steps + 1
        )));
    }

    let runs = runs
        .or(last_run.map(|n| n + 1))
        .ok_or_else(|| IoError::validation("run count not found, pass it explicitly"))?;
    Ok(FrequencySummary {
        runs,
        steps,
        entries,
    })
}

fn parse_entry(line: &str) -> Result<SummaryEntry> {
    let mut parts = line.splitn(3, '|');
    let (Some(name), Some(max_state), Some(sums)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(IoError::validation(format!("malformed line '{line}'")));
    };
    let max_state = max_state
        .trim()
        .parse()
        .map_err(|_| IoError::validation(format!("bad max state in '{line}'")))?;
    let sums = sums
        .split_whitespace()
        .map(|s| {
            s.parse::<u64>()
                .map_err(|_| IoError::validation(format!("bad sum '{s}' in '{line}'")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SummaryEntry {
        name: name.trim().to_string(),
        max_state,
        sums,
    })
}

pub fn read_summary<P: AsRef<Path>>(path: P, runs: Option<usize>) -> Result<FrequencySummary> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("reading trace {:?}", path)))?;
    parse_summary(&text, runs).map_err(|e| e.with_context(format!("parsing trace {:?}", path)))
}

/// Expected end values, a `name = value` table in TOML or a JSON object.
pub fn read_expected<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, f64>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading expected values {:?}", path))
    })?;
    match ModelFormat::from_path(path)? {
        ModelFormat::Toml => from_toml(&text),
        ModelFormat::Json => from_json(&text),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    /// Sum of absolute differences over the expected elements found.
    pub score: f64,
    /// Absolute difference per scored element.
    pub differences: BTreeMap<String, f64>,
    /// Expected elements absent from the summary.
    pub missing: Vec<String>,
}

/// Scores normalised end values against expected ones. Lower is better.
pub fn score_against_expected(
    summary: &FrequencySummary,
    expected: &BTreeMap<String, f64>,
) -> ScoreReport {
    let actual = summary.end_values();
    let mut differences = BTreeMap::new();
    let mut missing = Vec::new();
    for (name, want) in expected {
        match actual.get(name) {
            Some(got) => {
                differences.insert(name.clone(), (want - got).abs());
            }
            None => {
                tracing::warn!(element = %name, "Expected element missing from summary");
                missing.push(name.clone());
            }
        }
    }
    ScoreReport {
        score: differences.values().sum(),
        differences,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = "Run #0\nA 2 2\nRun #1\nA 2 2\n\nFrequency Summary:\nA|3| 4 4 4\nB|2| 0 1 2\n";

    #[test]
    fn test_parse_summary() {
        let summary = parse_summary(TRACE, None).unwrap();
        assert_eq!(summary.runs, 2);
        assert_eq!(summary.steps, 2);
        assert_eq!(summary.entry("B").unwrap().sums, vec![0, 1, 2]);
        assert_eq!(summary.entry("A").unwrap().max_state, 3);
    }

    #[test]
    fn test_explicit_runs_override() {
        let summary = parse_summary(TRACE, Some(4)).unwrap();
        assert_eq!(summary.end_values()["A"], 1.0);
    }

    #[test]
    fn test_missing_section() {
        assert!(parse_summary("Run #0\nA 1 1\n", None).is_err());
    }

    #[test]
    fn test_missing_run_count() {
        let err = parse_summary("Frequency Summary:\nA|3| 1 2\n", None).unwrap_err();
        assert!(matches!(err, IoError::Validation(_)));
    }

    #[test]
    fn test_ragged_sums_rejected() {
        let text = "Run #0\n\nFrequency Summary:\nA|3| 1 2\nB|3| 1\n";
        assert!(parse_summary(text, None).is_err());
    }

    #[test]
    fn test_score() {
        let summary = parse_summary(TRACE, None).unwrap();
        let expected: BTreeMap<String, f64> =
            [("A".to_string(), 1.5), ("B".to_string(), 1.0), ("C".to_string(), 2.0)]
                .into_iter()
                .collect();
        let report = score_against_expected(&summary, &expected);
        assert!((report.score - 0.5).abs() < 1e-9);
        assert_eq!(report.differences["B"], 0.0);
        assert_eq!(report.missing, vec!["C".to_string()]);
    }
}
