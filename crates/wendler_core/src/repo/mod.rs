//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from import/report orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`Schema`, `InvalidData`) in
//!   addition to DB transport errors.

pub mod session_repo;
