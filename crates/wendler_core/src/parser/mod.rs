//! Free-text workout-log parsing.
//!
//! # Responsibility
//! - Resolve lift-name aliases to canonical lifts.
//! - Classify `<reps>x<weight>` lines and coerce their tokens.
//! - Run the per-note state machine that groups sets under lifts.
//!
//! # Invariants
//! - Parsing is total: every input yields a (possibly empty) entry list.
//! - Parsing is pure and deterministic; diagnostics are returned, not logged.

pub mod session_parser;
pub mod set_line;
pub mod vocabulary;

pub use session_parser::{parse_note, parse_session_text, MalformedLine, ParseOutcome};
pub use set_line::{classify_set_line, parse_reps, parse_weight, SetLine};
pub use vocabulary::{canonicalize, lift_aliases};
