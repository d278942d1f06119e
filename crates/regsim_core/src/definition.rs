//! Validation of raw model rows into element definitions.

use crate::config::DefaultsConfig;
use crate::error::{Result, SimError};
use crate::expression::Expr;
use regsim_data::{Cell, ElementRow, InitialValue, SpontaneousDelays, Toggle};

/// A fully validated element definition with parsed expressions.
#[derive(Debug, Clone)]
pub struct ElementDefinition {
    pub name: String,
    pub max_state: u32,
    pub activators: Option<Expr>,
    pub inhibitors: Option<Expr>,
    /// One threshold per directed transition, `2*(max_state-1)` entries.
    pub delays: Vec<u32>,
    pub initial: InitialValue,
    pub spontaneous: SpontaneousDelays,
    pub toggles: Vec<Toggle>,
    pub update_group: Option<String>,
}

impl ElementDefinition {
    /// An unregulated element with no delays, no spontaneous drift and
    /// initial value 0.
    #[must_use]
    pub fn new(name: &str, max_state: u32) -> Self {
        Self {
            name: name.to_string(),
            max_state,
            activators: None,
            inhibitors: None,
            delays: vec![0; 2 * max_state.saturating_sub(1) as usize],
            initial: InitialValue::Fixed(0),
            spontaneous: SpontaneousDelays::default(),
            toggles: Vec::new(),
            update_group: None,
        }
    }

    /// Validates one model row. Blank cells fall back to `defaults`.
    pub fn from_row(row: &ElementRow, defaults: &DefaultsConfig) -> Result<Self> {
        let name = row.name.trim();
        if name.is_empty() {
            return Err(SimError::config("element name is empty"));
        }
        Self::parse_row(name, row, defaults)
            .map_err(|e| e.with_context(format!("element '{name}'")))
    }

    fn parse_row(name: &str, row: &ElementRow, defaults: &DefaultsConfig) -> Result<Self> {
        let max_state = match present(&row.max_state) {
            Some(cell) => cell_u32(cell, "max_state")?,
            None => defaults.max_state,
        };
        if max_state < 2 {
            return Err(SimError::config(format!(
                "max_state must be at least 2, got {max_state}"
            )));
        }
        let top = max_state - 1;

        let activators = parse_expr(row.activators.as_deref(), "activators")?;
        let inhibitors = parse_expr(row.inhibitors.as_deref(), "inhibitors")?;
        let delays = parse_delays(present(&row.delays), max_state)?;

        let initial = match present(&row.initial) {
            Some(cell) => parse_initial(cell, max_state)?,
            None => return Err(SimError::config("missing initial value")),
        };

        let spontaneous = match present(&row.spontaneous) {
            Some(cell) => parse_spontaneous(cell)?,
            None => SpontaneousDelays {
                activation: defaults.spontaneous_activation,
                inhibition: defaults.spontaneous_inhibition,
            },
        };

        let times = match present(&row.toggle_times) {
            Some(cell) => list_u32(cell, "toggle_times")?,
            None => Vec::new(),
        };
        let values = match present(&row.toggle_values) {
            Some(cell) => list_u32(cell, "toggle_values")?,
            None => Vec::new(),
        };
        if times.len() != values.len() {
            return Err(SimError::config(format!(
                "{} toggle times but {} toggle values",
                times.len(),
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| **v > top) {
            return Err(SimError::config(format!(
                "toggle value {bad} outside [0, {top}]"
            )));
        }
        let toggles = times
            .into_iter()
            .zip(values)
            .map(|(step, value)| Toggle {
                step: step as usize,
                value,
            })
            .collect();

        let update_group = present(&row.update_group).map(Cell::to_text);

        Ok(Self {
            name: name.to_string(),
            max_state,
            activators,
            inhibitors,
            delays,
            initial,
            spontaneous,
            toggles,
            update_group,
        })
    }
}

fn present(cell: &Option<Cell>) -> Option<&Cell> {
    cell.as_ref().filter(|c| !c.is_blank())
}

fn parse_expr(text: Option<&str>, side: &str) -> Result<Option<Expr>> {
    Expr::parse(text.unwrap_or("")).map_err(|e| e.with_context(side.to_string()))
}

fn to_u32(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        SimError::config(format!("{column}: {value} is not a non-negative integer"))
    })
}

fn token_u32(token: &str, column: &str) -> Result<u32> {
    let value: i64 = token
        .parse()
        .map_err(|_| SimError::config(format!("{column}: '{token}' is not an integer")))?;
    to_u32(value, column)
}

fn cell_u32(cell: &Cell, column: &str) -> Result<u32> {
    match cell {
        Cell::Int(v) => to_u32(*v, column),
        Cell::Text(s) => token_u32(s.trim(), column),
        Cell::List(_) => Err(SimError::config(format!(
            "{column}: expected a single integer"
        ))),
    }
}

/// Lists accept an integer, an array, or text separated by commas and/or whitespace.
fn list_u32(cell: &Cell, column: &str) -> Result<Vec<u32>> {
    match cell {
        Cell::Int(v) => Ok(vec![to_u32(*v, column)?]),
        Cell::List(values) => values.iter().map(|v| to_u32(*v, column)).collect(),
        Cell::Text(s) => s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| token_u32(t, column))
            .collect(),
    }
}

fn parse_delays(cell: Option<&Cell>, max_state: u32) -> Result<Vec<u32>> {
    let count = 2 * (max_state as usize - 1);
    let Some(cell) = cell else {
        return Ok(vec![0; count]);
    };
    let delays = list_u32(cell, "delays")?;
    match delays.len() {
        n if n == count => Ok(delays),
        1 => Ok(vec![delays[0]; count]),
        n => Err(SimError::config(format!(
            "delays: expected {count} values (rising then falling) or a single value, got {n}"
        ))),
    }
}

fn parse_initial(cell: &Cell, max_state: u32) -> Result<InitialValue> {
    let top = max_state - 1;
    let level = match cell {
        Cell::Int(v) => to_u32(*v, "initial")?,
        Cell::List(_) => return Err(SimError::config("initial: expected a single value")),
        Cell::Text(s) => match s.trim().to_lowercase().as_str() {
            "r" | "random" => return Ok(InitialValue::Random),
            "l" | "low" => 0,
            "m" | "med" | "medium" | "middle" | "moderate" => max_state / 2,
            "h" | "high" => top,
            other => other.parse::<u32>().map_err(|_| {
                SimError::config(format!("initial: unknown value '{other}'"))
            })?,
        },
    };
    if level > top {
        return Err(SimError::config(format!(
            "initial value {level} outside [0, {top}]"
        )));
    }
    Ok(InitialValue::Fixed(level))
}

/// `activation,inhibition`; a blank side disables drift in that direction.
fn parse_spontaneous(cell: &Cell) -> Result<SpontaneousDelays> {
    let tokens: Vec<String> = match cell {
        Cell::List(values) => values.iter().map(|v| v.to_string()).collect(),
        other => other
            .to_text()
            .split(',')
            .map(|t| t.trim().to_string())
            .collect(),
    };
    if tokens.len() != 2 {
        return Err(SimError::config(format!(
            "spontaneous: expected 'activation,inhibition', got {} token(s)",
            tokens.len()
        )));
    }
    let side = |t: &str| -> Result<Option<u32>> {
        if t.is_empty() {
            Ok(None)
        } else {
            token_u32(t, "spontaneous").map(Some)
        }
    };
    Ok(SpontaneousDelays {
        activation: side(&tokens[0])?,
        inhibition: side(&tokens[1])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str) -> ElementRow {
        ElementRow {
            name: name.to_string(),
            initial: Some(Cell::Int(0)),
            ..Default::default()
        }
    }

    fn parse(row: &ElementRow) -> Result<ElementDefinition> {
        ElementDefinition::from_row(row, &DefaultsConfig::default())
    }

    fn root_is_config(err: &SimError) -> bool {
        matches!(err.root(), SimError::Config(_))
    }

    #[test]
    fn test_blank_columns_use_defaults() {
        let def = parse(&row("A")).unwrap();
        assert_eq!(def.max_state, 3);
        assert_eq!(def.delays, vec![0; 4]);
        assert!(def.activators.is_none() && def.inhibitors.is_none());
        assert_eq!(def.spontaneous.activation, Some(2));
        assert_eq!(def.spontaneous.inhibition, Some(2));
        assert!(def.toggles.is_empty());
    }

    #[test]
    fn test_delay_broadcast_and_list() {
        let mut r = row("A");
        r.delays = Some(Cell::Int(3));
        assert_eq!(parse(&r).unwrap().delays, vec![3; 4]);
        r.delays = Some(Cell::from("1, 2, 2, 1"));
        assert_eq!(parse(&r).unwrap().delays, vec![1, 2, 2, 1]);
        r.delays = Some(Cell::List(vec![4, 5, 6, 7]));
        assert_eq!(parse(&r).unwrap().delays, vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_delay_wrong_count() {
        let mut r = row("A");
        r.delays = Some(Cell::from("1,2,3"));
        let err = parse(&r).unwrap_err();
        assert!(root_is_config(&err));
        assert!(err.to_string().contains("element 'A'"));
    }

    #[test]
    fn test_initial_tokens() {
        let mut r = row("A");
        r.max_state = Some(Cell::Int(4));
        for (token, expected) in [
            ("low", InitialValue::Fixed(0)),
            ("M", InitialValue::Fixed(2)),
            ("moderate", InitialValue::Fixed(2)),
            ("High", InitialValue::Fixed(3)),
            ("r", InitialValue::Random),
            ("1", InitialValue::Fixed(1)),
        ] {
            r.initial = Some(Cell::from(token));
            assert_eq!(parse(&r).unwrap().initial, expected, "token {token}");
        }
    }

    #[test]
    fn test_initial_errors() {
        let mut r = row("A");
        r.initial = None;
        assert!(root_is_config(&parse(&r).unwrap_err()));
        r.initial = Some(Cell::from("sometimes"));
        assert!(root_is_config(&parse(&r).unwrap_err()));
        r.initial = Some(Cell::Int(3));
        assert!(root_is_config(&parse(&r).unwrap_err()));
    }

    #[test]
    fn test_spontaneous_pair() {
        let mut r = row("A");
        r.spontaneous = Some(Cell::from(",0"));
        let def = parse(&r).unwrap();
        assert_eq!(def.spontaneous.activation, None);
        assert_eq!(def.spontaneous.inhibition, Some(0));

        r.spontaneous = Some(Cell::from(","));
        let def = parse(&r).unwrap();
        assert_eq!(def.spontaneous, SpontaneousDelays::default());

        r.spontaneous = Some(Cell::Int(1));
        assert!(root_is_config(&parse(&r).unwrap_err()));
        r.spontaneous = Some(Cell::from("1,2,3"));
        assert!(root_is_config(&parse(&r).unwrap_err()));
    }

    #[test]
    fn test_toggles() {
        let mut r = row("A");
        r.toggle_times = Some(Cell::from("2 5"));
        r.toggle_values = Some(Cell::from("2,0"));
        let def = parse(&r).unwrap();
        assert_eq!(
            def.toggles,
            vec![Toggle { step: 2, value: 2 }, Toggle { step: 5, value: 0 }]
        );

        r.toggle_values = Some(Cell::Int(1));
        assert!(root_is_config(&parse(&r).unwrap_err()));
        r.toggle_values = Some(Cell::from("2 3"));
        assert!(root_is_config(&parse(&r).unwrap_err()));
    }

    #[test]
    fn test_expression_parse_error_surfaces() {
        let mut r = row("A");
        r.activators = Some("(B,C".to_string());
        let err = parse(&r).unwrap_err();
        assert!(matches!(err.root(), SimError::Parse { .. }));
    }

    #[test]
    fn test_invalid_basics() {
        assert!(root_is_config(&parse(&row("  ")).unwrap_err()));
        let mut r = row("A");
        r.max_state = Some(Cell::Int(1));
        assert!(root_is_config(&parse(&r).unwrap_err()));
        r.max_state = Some(Cell::from("three"));
        assert!(root_is_config(&parse(&r).unwrap_err()));
    }

    #[test]
    fn test_update_group_text() {
        let mut r = row("A");
        r.update_group = Some(Cell::Int(7));
        assert_eq!(parse(&r).unwrap().update_group.as_deref(), Some("7"));
    }
}
