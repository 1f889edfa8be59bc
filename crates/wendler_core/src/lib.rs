//! Core domain logic for turning free-form workout-log notes into structured
//! lift records.
//!
//! Data flows from a `NoteSource` through the session parser into the
//! SQLite session store; reports read the store independently.

pub mod config;
pub mod db;
pub mod fetch;
pub mod logging;
pub mod model;
pub mod parser;
pub mod repo;
pub mod service;

pub use fetch::{
    CatchClient, Credentials, FetchError, FetchResult, NoteSnapshot, NoteSource, SnapshotError,
    SnapshotFile,
};
pub use logging::{default_log_level, init_logging};
pub use model::lift::CanonicalLift;
pub use model::session::{LiftEntry, ParsedSession, RawNote, SetObservation};
pub use parser::{canonicalize, parse_note, parse_session_text, MalformedLine, ParseOutcome};
pub use repo::session_repo::{
    RepoError, RepoResult, SchemaError, SessionId, SessionRepository, SqliteSessionRepository,
    StoredEntry,
};
pub use service::import_service::{
    import_sessions, parse_notes, ImportService, ImportSummary, ParsedBatch,
};
pub use service::report_service::{
    estimated_one_rep_max, ReportError, ReportFile, ReportPoint, ReportService,
};
