//! Set-line grammar and token coercion.
//!
//! A set line is `<reps>x<weight>` with a single `x` separator, matched on the
//! lowercased line.

use crate::model::session::SetObservation;
use once_cell::sync::Lazy;
use regex::Regex;

static SET_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^x]*)x([^x]*)$").expect("valid set line regex"));

/// Classification of one line seen while collecting sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetLine {
    /// Blank line or a line without any `x`.
    Delimiter,
    /// Line split cleanly into reps and weight.
    Observation(SetObservation),
    /// Line containing more than one `x`.
    Malformed,
}

/// Classifies a line against the set-line grammar.
pub fn classify_set_line(line: &str) -> SetLine {
    let lowered = line.to_lowercase();
    let trimmed = lowered.trim();
    if trimmed.is_empty() || !trimmed.contains('x') {
        return SetLine::Delimiter;
    }

    match SET_LINE_RE.captures(trimmed) {
        Some(caps) => {
            let reps = caps.get(1).map_or("", |m| m.as_str());
            let weight = caps.get(2).map_or("", |m| m.as_str());
            SetLine::Observation(SetObservation::new(parse_reps(reps), parse_weight(weight)))
        }
        None => SetLine::Malformed,
    }
}

/// Reads a reps token; surrounding whitespace is ignored.
///
/// Returns `None` for anything that is not a non-negative integer.
pub fn parse_reps(token: &str) -> Option<u32> {
    token.trim().parse::<u32>().ok()
}

/// Reads a weight token as trimmed text.
pub fn parse_weight(token: &str) -> String {
    token.trim().to_string()
}
