//! Serialization helpers for JSON and TOML.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializes data to pretty-printed JSON.
pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Deserializes data from a JSON string.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }
    Ok(serde_json::from_str(json)?)
}

/// Deserializes data from a TOML string.
pub fn from_toml<T>(text: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    Ok(toml::from_str(text)?)
}

/// Writes pretty JSON to a file.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = to_json_pretty(data)?;
    std::fs::write(&path, json).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", path.as_ref()))
    })?;
    Ok(())
}

/// Reads JSON from a file.
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let json = std::fs::read_to_string(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path.as_ref()))
    })?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regsim_data::{FrequencySummary, SummaryEntry};

    fn summary() -> FrequencySummary {
        FrequencySummary {
            runs: 2,
            steps: 1,
            entries: vec![SummaryEntry {
                name: "A".into(),
                max_state: 3,
                sums: vec![2, 4],
            }],
        }
    }

    #[test]
    fn test_json_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("regsim_json_{}.json", std::process::id()));
        write_json_file(&summary(), &path).unwrap();
        let restored: FrequencySummary = read_json_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(restored, summary());
    }

    #[test]
    fn test_empty_json_rejected() {
        let res: Result<FrequencySummary> = from_json("  ");
        assert!(matches!(res, Err(IoError::Validation(_))));
    }

    #[test]
    fn test_missing_file_has_context() {
        let res: Result<FrequencySummary> = read_json_file("/nonexistent/summary.json");
        let err = res.unwrap_err();
        assert!(err.to_string().contains("reading JSON"));
    }

    #[test]
    fn test_bad_toml() {
        let res: Result<FrequencySummary> = from_toml("runs = [");
        assert!(matches!(res, Err(IoError::Toml(_))));
    }
}
