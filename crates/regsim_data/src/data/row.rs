use serde::{Deserialize, Serialize};

/// One cell of a tabular model definition.
///
/// Definition files are usually exported from spreadsheets, so a column may
/// hold a bare number, a list of numbers, or free text such as `"1,2,2,1"`
/// or `"high"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Cell {
    /// A single integer.
    Int(i64),
    /// An explicit list of integers.
    List(Vec<i64>),
    /// Free text, interpreted per column.
    Text(String),
}

impl Cell {
    /// Renders the cell as the text a spreadsheet would show.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Cell::Int(v) => v.to_string(),
            Cell::List(values) => values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(","),
            Cell::Text(s) => s.trim().to_string(),
        }
    }

    /// A blank cell is treated the same as a missing one.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Int(_) => false,
            Cell::List(values) => values.is_empty(),
            Cell::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Int(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// Raw definition of one network element, one field per input column.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ElementRow {
    /// Element name.
    pub name: String,
    /// Activator expression text.
    pub activators: Option<String>,
    /// Inhibitor expression text.
    pub inhibitors: Option<String>,
    /// Number of discrete levels.
    pub max_state: Option<Cell>,
    /// Per-transition delays (one value, or `2*(max_state-1)` values).
    pub delays: Option<Cell>,
    /// Initial value: a level or one of the `low/medium/high/random` tokens.
    pub initial: Option<Cell>,
    /// Spontaneous `activation,inhibition` delay pair.
    pub spontaneous: Option<Cell>,
    /// Steps at which the value is forced.
    pub toggle_times: Option<Cell>,
    /// Forced values, parallel to `toggle_times`.
    pub toggle_values: Option<Cell>,
    /// Update group identifier for grouped random-asynchronous updates.
    pub update_group: Option<Cell>,
}

impl ElementRow {
    /// Creates a row with only a name and regulator expressions set.
    #[must_use]
    pub fn new(name: &str, activators: &str, inhibitors: &str) -> Self {
        Self {
            name: name.to_string(),
            activators: Some(activators.to_string()),
            inhibitors: Some(inhibitors.to_string()),
            ..Default::default()
        }
    }
}

/// A whole model definition file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFile {
    #[serde(rename = "element", default)]
    pub elements: Vec<ElementRow>,
}
