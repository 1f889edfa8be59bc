//! Raw notes and parsed training sessions.
//!
//! # Responsibility
//! - Carry note text from a source into the parser.
//! - Hold the structured result of parsing one note.
//!
//! # Invariants
//! - `LiftEntry::sets` is non-empty and never mutated after construction.
//! - Unknown reps stay `None`; they are never coerced to zero.
//! - Weight is the raw parsed text, not a cleaned number.

use crate::model::lift::CanonicalLift;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One note as returned by a note source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNote {
    /// Creation time reported by the source, when present and parseable.
    pub created_at: Option<DateTime<Utc>>,
    /// Free-form note body.
    pub text: String,
}

impl RawNote {
    pub fn new(created_at: Option<DateTime<Utc>>, text: impl Into<String>) -> Self {
        Self {
            created_at,
            text: text.into(),
        }
    }
}

/// One `<reps>x<weight>` observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetObservation {
    /// `None` when the reps token could not be read as a count.
    pub reps: Option<u32>,
    /// Trimmed weight text as written in the note.
    pub weight: String,
}

impl SetObservation {
    pub fn new(reps: Option<u32>, weight: impl Into<String>) -> Self {
        Self {
            reps,
            weight: weight.into(),
        }
    }
}

/// A canonical lift plus the ordered sets recorded for it.
///
/// The last set is treated downstream as the working set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiftEntry {
    lift: CanonicalLift,
    sets: Vec<SetObservation>,
}

impl LiftEntry {
    /// Seals a lift with its sets. Returns `None` when `sets` is empty.
    pub fn from_sets(lift: CanonicalLift, sets: Vec<SetObservation>) -> Option<Self> {
        if sets.is_empty() {
            None
        } else {
            Some(Self { lift, sets })
        }
    }

    pub fn lift(&self) -> CanonicalLift {
        self.lift
    }

    pub fn sets(&self) -> &[SetObservation] {
        &self.sets
    }

    /// Returns the last listed set, the one persisted by the store.
    pub fn working_set(&self) -> Option<&SetObservation> {
        self.sets.last()
    }
}

/// Structured result of parsing one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedSession {
    pub date: Option<DateTime<Utc>>,
    /// Original note text.
    pub text: String,
    /// Entries in the order they appear; may be empty.
    pub entries: Vec<LiftEntry>,
}

#[cfg(test)]
mod tests {
    use super::{LiftEntry, SetObservation};
    use crate::model::lift::CanonicalLift;

    #[test]
    fn lift_entry_requires_at_least_one_set() {
        assert!(LiftEntry::from_sets(CanonicalLift::Squat, Vec::new()).is_none());
    }

    #[test]
    fn working_set_is_last_listed_set() {
        let entry = LiftEntry::from_sets(
            CanonicalLift::Deadlift,
            vec![
                SetObservation::new(Some(5), "225"),
                SetObservation::new(Some(3), "275"),
            ],
        )
        .unwrap();
        assert_eq!(
            entry.working_set(),
            Some(&SetObservation::new(Some(3), "275"))
        );
    }
}
