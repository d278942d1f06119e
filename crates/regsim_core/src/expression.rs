//! Regulator expressions: parsing and scoring.
//!
//! An expression is a comma separated list of units. Each unit is one of
//!
//! - `name`: the regulator's current value
//! - `!name`: discrete NOT, `max_level - value`
//! - `name+`: `max_level` when the regulator sits at its highest level, else 0
//! - `!name+`: `max_level` when the regulator is below its highest level, else 0
//! - `(a,b,...)`: discrete AND, the minimum of the members
//! - `{a,...}`: initializer, only valid at the top level; adds the sum of its members
//! - `{must}[enhance]`: necessary pair; 0 when every `must` member is 0, else
//!   `min(max(must) + max(enhance), max_level)`
//!
//! The top level score is the sum of all unit contributions. Text is parsed
//! once into an immutable [`Expr`]; scoring is a pure walk over the tree.

use crate::error::{Result, SimError};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::BuildHasher;

/// Read access to the current values of named elements.
pub trait Snapshot {
    fn value(&self, name: &str) -> Option<u32>;
}

impl<S: BuildHasher> Snapshot for HashMap<String, u32, S> {
    fn value(&self, name: &str) -> Option<u32> {
        self.get(name).copied()
    }
}

impl Snapshot for BTreeMap<String, u32> {
    fn value(&self, name: &str) -> Option<u32> {
        self.get(name).copied()
    }
}

/// Characters allowed in element names besides letters and digits.
const NAME_PUNCTUATION: &[char] = &['.', '_', '@', '*', '#', '/', ';'];

/// Whether `c` may appear in an element name.
#[must_use]
pub fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || NAME_PUNCTUATION.contains(&c)
}

/// A reference to one regulator, with its optional operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRef {
    pub name: String,
    /// Prefixed with `!`.
    pub negated: bool,
    /// Suffixed with `+`.
    pub highest: bool,
}

/// One node of a parsed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Name(NameRef),
    And(Vec<Term>),
    Initializer(Vec<Term>),
    NecessaryPair { must: Vec<Term>, enhance: Vec<Term> },
}

/// A parsed activator or inhibitor expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    terms: Vec<Term>,
}

impl Expr {
    /// Parses expression text. Whitespace is ignored; blank text yields `None`
    /// (no regulators of that polarity).
    pub fn parse(text: &str) -> Result<Option<Expr>> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Ok(None);
        }
        let terms =
            parse_list(&compact, 0).map_err(|reason| SimError::parse(compact.clone(), reason))?;
        Ok(Some(Expr { terms }))
    }

    /// Top level units in source order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Scores the expression against `snapshot`.
    ///
    /// `max_state` is the level count of the element being regulated.
    pub fn score<S: Snapshot + ?Sized>(&self, snapshot: &S, max_state: u32) -> Result<u32> {
        let max_level = max_state.saturating_sub(1);
        let mut total = 0u32;
        for term in &self.terms {
            let contribution = match term {
                Term::Initializer(members) => {
                    let mut sum = 0u32;
                    for member in members {
                        sum = sum.saturating_add(score_term(member, snapshot, max_level)?);
                    }
                    sum
                }
                other => score_term(other, snapshot, max_level)?,
            };
            total = total.saturating_add(contribution);
        }
        Ok(total)
    }

    /// Every element name referenced anywhere in the expression.
    #[must_use]
    pub fn names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for term in &self.terms {
            collect_names(term, &mut names);
        }
        names
    }
}

fn collect_names(term: &Term, names: &mut BTreeSet<String>) {
    match term {
        Term::Name(r) => {
            names.insert(r.name.clone());
        }
        Term::And(members) | Term::Initializer(members) => {
            for m in members {
                collect_names(m, names);
            }
        }
        Term::NecessaryPair { must, enhance } => {
            for m in must.iter().chain(enhance) {
                collect_names(m, names);
            }
        }
    }
}

fn score_term<S: Snapshot + ?Sized>(term: &Term, snapshot: &S, max_level: u32) -> Result<u32> {
    match term {
        Term::Name(r) => score_name(r, snapshot, max_level),
        Term::And(members) => {
            let mut min = u32::MAX;
            for member in members {
                min = min.min(score_term(member, snapshot, max_level)?);
            }
            Ok(min)
        }
        Term::NecessaryPair { must, enhance } => {
            let must_max = max_score(must, snapshot, max_level)?;
            if must_max == 0 {
                return Ok(0);
            }
            let enhance_max = max_score(enhance, snapshot, max_level)?;
            Ok(must_max.saturating_add(enhance_max).min(max_level))
        }
        // Rejected by the parser below the top level.
        Term::Initializer(members) => max_score(members, snapshot, max_level),
    }
}

fn max_score<S: Snapshot + ?Sized>(terms: &[Term], snapshot: &S, max_level: u32) -> Result<u32> {
    let mut max = 0;
    for term in terms {
        max = max.max(score_term(term, snapshot, max_level)?);
    }
    Ok(max)
}

fn score_name<S: Snapshot + ?Sized>(r: &NameRef, snapshot: &S, max_level: u32) -> Result<u32> {
    let value = snapshot
        .value(&r.name)
        .ok_or_else(|| SimError::lookup(r.name.clone()))?;
    match (r.negated, r.highest) {
        (false, false) => Ok(value),
        (true, false) => discrete_not(&r.name, value, max_level),
        (false, true) => Ok(if value == max_level { max_level } else { 0 }),
        (true, true) => Ok(if value != max_level { max_level } else { 0 }),
    }
}

/// Discrete NOT over levels `0..=max_level`.
pub fn discrete_not(name: &str, value: u32, max_level: u32) -> Result<u32> {
    max_level.checked_sub(value).ok_or_else(|| SimError::Range {
        name: name.to_string(),
        value,
        max_level,
    })
}

/// Splits on commas outside any bracket. The final unit always runs to the
/// end of the text, so a trailing comma stays inside the last unit.
pub(crate) fn split_units(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;
    let last = text.char_indices().last().map(|(i, _)| i);
    for (i, c) in text.char_indices() {
        if Some(i) == last {
            units.push(&text[start..]);
            break;
        }
        match c {
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => depth -= 1,
            ',' if depth == 0 => {
                units.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    units
}

/// Index of the bracket closing the one at byte `open`, if well nested.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut stack = Vec::new();
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => stack.push(')'),
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            ')' | '}' | ']' => {
                if stack.pop() != Some(c) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_list(text: &str, layer: usize) -> std::result::Result<Vec<Term>, String> {
    if text.is_empty() {
        return Err("empty group".to_string());
    }
    split_units(text)
        .into_iter()
        .map(|unit| parse_unit(unit, layer))
        .collect()
}

fn parse_unit(unit: &str, layer: usize) -> std::result::Result<Term, String> {
    if unit.is_empty() {
        return Err("empty unit".to_string());
    }
    let last = unit.len() - 1;
    if unit.starts_with('{') && unit.ends_with('}') {
        if layer != 0 {
            return Err(format!("initializer '{unit}' is only allowed at the top level"));
        }
        if matching_close(unit, 0) != Some(last) {
            return Err(format!("malformed initializer '{unit}'"));
        }
        return Ok(Term::Initializer(parse_list(&unit[1..last], layer + 1)?));
    }
    if unit.starts_with('{') && unit.ends_with(']') {
        let cut = matching_close(unit, 0)
            .ok_or_else(|| format!("unbalanced brackets in '{unit}'"))?;
        if !unit[cut..].starts_with('}')
            || !unit[cut + 1..].starts_with('[')
            || matching_close(unit, cut + 1) != Some(last)
        {
            return Err(format!("malformed necessary pair '{unit}'"));
        }
        return Ok(Term::NecessaryPair {
            must: parse_list(&unit[1..cut], layer + 1)?,
            enhance: parse_list(&unit[cut + 2..last], layer + 1)?,
        });
    }
    if unit.starts_with('(') && unit.ends_with(')') {
        if matching_close(unit, 0) != Some(last) {
            return Err(format!("malformed AND group '{unit}'"));
        }
        return Ok(Term::And(parse_list(&unit[1..last], layer + 1)?));
    }
    parse_name(unit).map(Term::Name)
}

fn parse_name(unit: &str) -> std::result::Result<NameRef, String> {
    let negated = unit.starts_with('!');
    let body = if negated { &unit[1..] } else { unit };
    let highest = body.ends_with('+');
    let name = if highest {
        &body[..body.len() - 1]
    } else {
        body
    };
    if name.contains(',') {
        return Err(format!("unexpected ',' inside '{unit}'"));
    }
    if name.is_empty() {
        return Err(format!("missing name in '{unit}'"));
    }
    if let Some(bad) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(match bad {
            '(' | ')' | '{' | '}' | '[' | ']' => format!("unbalanced brackets in '{unit}'"),
            other => format!("invalid character '{other}' in '{unit}'"),
        });
    }
    Ok(NameRef {
        name: name.to_string(),
        negated,
        highest,
    })
}

impl fmt::Display for NameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            f.write_str("!")?;
        }
        f.write_str(&self.name)?;
        if self.highest {
            f.write_str("+")?;
        }
        Ok(())
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, terms: &[Term]) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{term}")?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Name(r) => write!(f, "{r}"),
            Term::And(members) => {
                f.write_str("(")?;
                write_list(f, members)?;
                f.write_str(")")
            }
            Term::Initializer(members) => {
                f.write_str("{")?;
                write_list(f, members)?;
                f.write_str("}")
            }
            Term::NecessaryPair { must, enhance } => {
                f.write_str("{")?;
                write_list(f, must)?;
                f.write_str("}[")?;
                write_list(f, enhance)?;
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.terms)
    }
}
