//! Canonical lift identifiers.

use serde::{Deserialize, Serialize};

/// Normalized exercise identifier.
///
/// Every alias recognized in free text resolves to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalLift {
    Deadlift,
    BenchPress,
    Press,
    Squat,
}

impl CanonicalLift {
    /// All canonical lifts in report order.
    pub const ALL: [CanonicalLift; 4] = [
        CanonicalLift::BenchPress,
        CanonicalLift::Press,
        CanonicalLift::Deadlift,
        CanonicalLift::Squat,
    ];

    /// Label persisted in `session_entry.session_entry_lift`.
    pub fn storage_label(self) -> &'static str {
        match self {
            Self::Deadlift => "deadlift",
            Self::BenchPress => "bench press",
            Self::Press => "press",
            Self::Squat => "squat",
        }
    }

    /// Identifier used for file names and serialized output.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Deadlift => "deadlift",
            Self::BenchPress => "bench_press",
            Self::Press => "press",
            Self::Squat => "squat",
        }
    }

    /// Parses a persisted storage label back into a lift.
    pub fn from_storage_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lift| lift.storage_label() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::CanonicalLift;

    #[test]
    fn storage_labels_roundtrip() {
        for lift in CanonicalLift::ALL {
            assert_eq!(
                CanonicalLift::from_storage_label(lift.storage_label()),
                Some(lift)
            );
        }
        assert_eq!(CanonicalLift::from_storage_label("bench"), None);
    }

    #[test]
    fn bench_press_uses_spaced_label_and_snake_identifier() {
        assert_eq!(CanonicalLift::BenchPress.storage_label(), "bench press");
        assert_eq!(CanonicalLift::BenchPress.identifier(), "bench_press");
    }
}
