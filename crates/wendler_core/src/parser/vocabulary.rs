//! Lift-name vocabulary.
//!
//! # Invariants
//! - `LIFT_ALIASES` is ordered by descending alias length; equal lengths keep
//!   declaration order. The first alias that prefixes a line wins.

use crate::model::lift::CanonicalLift;

const LIFT_ALIASES: &[(&str, CanonicalLift)] = &[
    ("military press", CanonicalLift::Press),
    ("shoulder press", CanonicalLift::Press),
    ("deadlift", CanonicalLift::Deadlift),
    ("bench", CanonicalLift::BenchPress),
    ("press", CanonicalLift::Press),
    ("squat", CanonicalLift::Squat),
];

/// Returns the alias table in match order.
pub fn lift_aliases() -> &'static [(&'static str, CanonicalLift)] {
    LIFT_ALIASES
}

/// Resolves a line that starts with a known alias to its canonical lift.
///
/// Matching is case-insensitive over the trimmed line and only tests the
/// prefix, so trailing notes after the lift name are allowed.
pub fn canonicalize(line: &str) -> Option<CanonicalLift> {
    let normalized = line.trim().to_lowercase();
    LIFT_ALIASES
        .iter()
        .find(|(alias, _)| normalized.starts_with(alias))
        .map(|(_, lift)| *lift)
}
