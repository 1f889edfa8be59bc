//! Domain model for workout-log sessions.
//!
//! # Responsibility
//! - Define the canonical lift identifiers shared by parser, store and report.
//! - Define raw notes and the structured sessions parsed out of them.
//!
//! # Invariants
//! - Every stored or parsed lift is a `CanonicalLift`, never a raw alias.
//! - A `LiftEntry` always carries at least one set observation.

pub mod lift;
pub mod session;
