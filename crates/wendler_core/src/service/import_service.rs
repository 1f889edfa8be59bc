//! Import use-case service.
//!
//! # Responsibility
//! - Parse raw notes into sessions and report skipped set lines.
//! - Persist sessions and their working sets through a `SessionRepository`.
//! - Run a whole import inside one transaction.
//!
//! # Invariants
//! - One `session` row per parsed note, entries-free sessions included.
//! - Nothing is committed when any write fails.

use crate::model::session::{ParsedSession, RawNote};
use crate::parser::session_parser::parse_note;
use crate::repo::session_repo::{RepoResult, SessionRepository, SqliteSessionRepository};
use log::{info, warn};
use rusqlite::Connection;
use std::time::Instant;

/// Counts describing one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub sessions_written: usize,
    pub entries_written: usize,
}

/// Sessions parsed from a batch of notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBatch {
    pub sessions: Vec<ParsedSession>,
    /// Total set lines skipped as malformed across all notes.
    pub malformed_lines: usize,
}

/// Parses every note, logging malformed lines by position only.
pub fn parse_notes(notes: Vec<RawNote>) -> ParsedBatch {
    let mut batch = ParsedBatch::default();
    for (note_index, note) in notes.into_iter().enumerate() {
        let (session, malformed) = parse_note(note);
        for line in &malformed {
            warn!(
                "event=note_parse module=parser status=warn error_code=malformed_set_line note_index={} line={}",
                note_index, line.line_number
            );
        }
        batch.malformed_lines += malformed.len();
        batch.sessions.push(session);
    }
    batch
}

/// Session import facade over repository implementations.
pub struct ImportService<R: SessionRepository> {
    repo: R,
}

impl<R: SessionRepository> ImportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Writes each session followed by its entries.
    pub fn import(&self, sessions: &[ParsedSession]) -> RepoResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        for session in sessions {
            let session_id = self.repo.write_session(session)?;
            summary.sessions_written += 1;
            for entry in &session.entries {
                self.repo.write_entry(session_id, entry)?;
                summary.entries_written += 1;
            }
        }
        Ok(summary)
    }
}

/// Imports sessions into `conn` and commits once at the end.
///
/// # Errors
/// - `RepoError::Schema` when the connection was not migrated.
/// - `RepoError::Db` on any write failure; the transaction is rolled back.
pub fn import_sessions(conn: &mut Connection, sessions: &[ParsedSession]) -> RepoResult<ImportSummary> {
    let started_at = Instant::now();
    let tx = conn.transaction()?;
    let summary = {
        let repo = SqliteSessionRepository::try_new(&tx)?;
        ImportService::new(repo).import(sessions)?
    };
    tx.commit()?;

    info!(
        "event=session_import module=service status=ok duration_ms={} sessions={} entries={}",
        started_at.elapsed().as_millis(),
        summary.sessions_written,
        summary.entries_written
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::parse_notes;
    use crate::model::session::RawNote;

    #[test]
    fn parse_notes_keeps_one_session_per_note_and_counts_malformed() {
        let batch = parse_notes(vec![
            RawNote::new(None, "Squat\n5x185\n5x1x1"),
            RawNote::new(None, "rest day"),
        ]);
        assert_eq!(batch.sessions.len(), 2);
        assert_eq!(batch.sessions[0].entries.len(), 1);
        assert!(batch.sessions[1].entries.is_empty());
        assert_eq!(batch.malformed_lines, 1);
    }
}
