//! Per-note session parser.
//!
//! # Responsibility
//! - Scan a note line by line and group `<reps>x<weight>` sets under the
//!   lift named before them.
//! - Drop warm-up blocks delimited by two `warmup` marker lines.
//!
//! A lift's block runs from its name line up to the next blank line or the
//! next line naming a lift; only a `warmup` inside that block affects it.
//!
//! # Invariants
//! - An entry is sealed on the first delimiter line after at least one set;
//!   the delimiter line is consumed and not re-read as a lift name.
//! - At end of input an in-progress entry with sets is always sealed.
//! - Entries without sets are never emitted.
//! - Malformed set lines are skipped and reported, never fatal.

use crate::model::lift::CanonicalLift;
use crate::model::session::{LiftEntry, ParsedSession, RawNote, SetObservation};
use crate::parser::set_line::{classify_set_line, SetLine};
use crate::parser::vocabulary::canonicalize;

const WARMUP_MARKER: &str = "warmup";

/// A set line that could not be split into reps and weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based line number within the note.
    pub line_number: usize,
    /// Trimmed line content.
    pub text: String,
}

/// Entries parsed from one note plus skipped-line diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub entries: Vec<LiftEntry>,
    pub malformed: Vec<MalformedLine>,
}

enum ParserState {
    SeekingLift,
    /// `block_open` flips on the first marker; the second one ends the block.
    InWarmup {
        lift: CanonicalLift,
        block_open: bool,
    },
    CollectingSets {
        lift: CanonicalLift,
        sets: Vec<SetObservation>,
    },
}

/// Parses one note into a session, keeping its date and original text.
pub fn parse_note(note: RawNote) -> (ParsedSession, Vec<MalformedLine>) {
    let outcome = parse_session_text(&note.text);
    let session = ParsedSession {
        date: note.created_at,
        text: note.text,
        entries: outcome.entries,
    };
    (session, outcome.malformed)
}

/// Parses note text into lift entries.
pub fn parse_session_text(text: &str) -> ParseOutcome {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut outcome = ParseOutcome::default();
    let mut state = ParserState::SeekingLift;

    for (index, line) in lines.iter().enumerate() {
        state = match state {
            ParserState::SeekingLift => match canonicalize(line) {
                Some(lift) if block_has_warmup(&lines[index + 1..]) => {
                    ParserState::InWarmup {
                        lift,
                        block_open: false,
                    }
                }
                Some(lift) => ParserState::CollectingSets {
                    lift,
                    sets: Vec::new(),
                },
                None => ParserState::SeekingLift,
            },
            ParserState::InWarmup { lift, block_open } => {
                if !is_warmup_marker(line) {
                    ParserState::InWarmup { lift, block_open }
                } else if block_open {
                    ParserState::CollectingSets {
                        lift,
                        sets: Vec::new(),
                    }
                } else {
                    ParserState::InWarmup {
                        lift,
                        block_open: true,
                    }
                }
            }
            ParserState::CollectingSets { lift, mut sets } => match classify_set_line(line) {
                SetLine::Observation(observation) => {
                    sets.push(observation);
                    ParserState::CollectingSets { lift, sets }
                }
                SetLine::Delimiter if sets.is_empty() => ParserState::CollectingSets { lift, sets },
                SetLine::Delimiter => {
                    outcome.entries.extend(LiftEntry::from_sets(lift, sets));
                    ParserState::SeekingLift
                }
                SetLine::Malformed => {
                    outcome.malformed.push(MalformedLine {
                        line_number: index + 1,
                        text: line.trim().to_string(),
                    });
                    ParserState::CollectingSets { lift, sets }
                }
            },
        };
    }

    if let ParserState::CollectingSets { lift, sets } = state {
        outcome.entries.extend(LiftEntry::from_sets(lift, sets));
    }

    outcome
}

/// Looks for a warm-up marker in the lines following a lift name, up to the
/// end of that lift's block.
fn block_has_warmup(following: &[&str]) -> bool {
    following
        .iter()
        .take_while(|line| !line.trim().is_empty() && canonicalize(line).is_none())
        .any(|line| line.to_lowercase().contains(WARMUP_MARKER))
}

fn is_warmup_marker(line: &str) -> bool {
    line.trim().to_lowercase().starts_with(WARMUP_MARKER)
}

#[cfg(test)]
mod tests {
    use super::{parse_note, parse_session_text, MalformedLine};
    use crate::model::lift::CanonicalLift;
    use crate::model::session::{LiftEntry, RawNote, SetObservation};

    fn entry(lift: CanonicalLift, sets: &[(Option<u32>, &str)]) -> LiftEntry {
        LiftEntry::from_sets(
            lift,
            sets.iter()
                .map(|(reps, weight)| SetObservation::new(*reps, *weight))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn warmup_block_is_dropped() {
        let text = "Squat\nwarmup\n5x95\n5x135\nwarmup\n5x185\n3x225";
        let outcome = parse_session_text(text);
        assert_eq!(
            outcome.entries,
            vec![entry(
                CanonicalLift::Squat,
                &[(Some(5), "185"), (Some(3), "225")]
            )]
        );
        assert!(outcome.malformed.is_empty());
    }

    #[test]
    fn warmup_in_later_block_does_not_affect_earlier_lift() {
        let text = "Bench\n5x135\n3x185\n\nSquat\nwarmup\n5x95\nwarmup\n5x185";
        let outcome = parse_session_text(text);
        assert_eq!(
            outcome.entries,
            vec![
                entry(
                    CanonicalLift::BenchPress,
                    &[(Some(5), "135"), (Some(3), "185")]
                ),
                entry(CanonicalLift::Squat, &[(Some(5), "185")]),
            ]
        );
    }

    #[test]
    fn warmup_in_earlier_block_does_not_affect_later_lift() {
        let text = "Squat\nwarmup\n5x95\nwarmup\n5x185\n\nBench\n5x135";
        let outcome = parse_session_text(text);
        assert_eq!(
            outcome.entries,
            vec![
                entry(CanonicalLift::Squat, &[(Some(5), "185")]),
                entry(CanonicalLift::BenchPress, &[(Some(5), "135")]),
            ]
        );
    }

    #[test]
    fn warmup_lookahead_stops_at_next_lift_line() {
        let text = "Press\n5x65\nDeadlift\nwarmup\n5x135\nwarmup\n5x275";
        let outcome = parse_session_text(text);
        assert_eq!(
            outcome.entries,
            vec![entry(CanonicalLift::Press, &[(Some(5), "65")])]
        );
    }

    #[test]
    fn two_lifts_without_warmup_are_split_by_blank_line() {
        let text = "Bench\n5x135\n3x185\n\nPress\n5x45\n5x65";
        let outcome = parse_session_text(text);
        assert_eq!(
            outcome.entries,
            vec![
                entry(
                    CanonicalLift::BenchPress,
                    &[(Some(5), "135"), (Some(3), "185")]
                ),
                entry(CanonicalLift::Press, &[(Some(5), "45"), (Some(5), "65")]),
            ]
        );
    }

    #[test]
    fn text_without_lift_names_yields_no_entries() {
        let outcome = parse_session_text("rest day\n\nwalked 5km");
        assert!(outcome.entries.is_empty());
        assert!(parse_session_text("").entries.is_empty());
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = "Deadlift\n5x225\n3x275\n1x315\n\nsquat\n5x185";
        assert_eq!(parse_session_text(text), parse_session_text(text));
    }

    #[test]
    fn stray_blank_lines_before_first_set_are_tolerated() {
        let outcome = parse_session_text("Deadlift\n\n  \n5x225\n\n");
        assert_eq!(
            outcome.entries,
            vec![entry(CanonicalLift::Deadlift, &[(Some(5), "225")])]
        );
    }

    #[test]
    fn delimiter_line_is_not_reread_as_lift() {
        let outcome = parse_session_text("Bench\n5x100\nSquat\n5x200");
        assert_eq!(
            outcome.entries,
            vec![entry(CanonicalLift::BenchPress, &[(Some(5), "100")])]
        );
    }

    #[test]
    fn lift_without_sets_is_not_emitted() {
        assert!(parse_session_text("Squat\n\n").entries.is_empty());
        assert!(parse_session_text("Squat\nwarmup\n5x95").entries.is_empty());
    }

    #[test]
    fn trailing_entry_is_sealed_at_end_of_input() {
        let outcome = parse_session_text("Bench\n5x135\n\nSquat\n5x225");
        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.entries[1].lift(), CanonicalLift::Squat);
    }

    #[test]
    fn malformed_set_lines_are_skipped_and_reported() {
        let outcome = parse_session_text("Press\n5x95\n5x95x2\n3x105");
        assert_eq!(
            outcome.entries,
            vec![entry(CanonicalLift::Press, &[(Some(5), "95"), (Some(3), "105")])]
        );
        assert_eq!(
            outcome.malformed,
            vec![MalformedLine {
                line_number: 3,
                text: "5x95x2".to_string(),
            }]
        );
    }

    #[test]
    fn unknown_reps_are_kept_as_unknown() {
        let outcome = parse_session_text("Squat\n5x185\nfive x 205");
        assert_eq!(
            outcome.entries,
            vec![entry(
                CanonicalLift::Squat,
                &[(Some(5), "185"), (None, "205")]
            )]
        );
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let outcome = parse_session_text("Bench\r\n5x135\r\n3x185\r\n\r\nPress\r\n5x65\r\n");
        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.entries[0].sets()[1], SetObservation::new(Some(3), "185"));
    }

    #[test]
    fn parse_note_keeps_date_and_text() {
        let note = RawNote::new(None, "Squat\n5x185");
        let (session, malformed) = parse_note(note);
        assert_eq!(session.date, None);
        assert_eq!(session.text, "Squat\n5x185");
        assert_eq!(session.entries.len(), 1);
        assert!(malformed.is_empty());
    }
}
