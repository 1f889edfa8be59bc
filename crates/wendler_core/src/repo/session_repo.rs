//! Session repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist parsed sessions and their working sets.
//! - Read stored entries back per canonical lift for reporting.
//!
//! # Invariants
//! - Only the last set of each entry is persisted.
//! - Unknown reps are stored as NULL, never as 0.
//! - Construction fails with `SchemaError` until the schema is initialized.

use crate::db::DbError;
use crate::model::lift::CanonicalLift;
use crate::model::session::{LiftEntry, ParsedSession};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Text layout of `session.session_timestamp`.
pub const SESSION_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Row id of `session`.
pub type SessionId = i64;

pub type RepoResult<T> = Result<T, RepoError>;

/// Store schema is missing a required table or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaError {
    MissingTable(&'static str),
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTable(table) => {
                write!(f, "schema not initialized: missing table `{table}`")
            }
            Self::MissingColumn { table, column } => write!(
                f,
                "schema not initialized: missing column `{table}.{column}`"
            ),
        }
    }
}

impl Error for SchemaError {}

/// Repository error for session persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Schema(SchemaError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid session data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<SchemaError> for RepoError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

/// One persisted entry joined with its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub session_id: SessionId,
    /// Raw `session_timestamp` text, `None` when the note had no date.
    pub session_timestamp: Option<String>,
    pub lift: CanonicalLift,
    pub reps: Option<u32>,
    pub weight: Option<String>,
}

/// Repository interface for session storage.
pub trait SessionRepository {
    /// Inserts one session row and returns its id.
    fn write_session(&self, session: &ParsedSession) -> RepoResult<SessionId>;
    /// Inserts the working set of one entry under `session_id`.
    fn write_entry(&self, session_id: SessionId, entry: &LiftEntry) -> RepoResult<()>;
    /// Lists entries for one lift ordered by timestamp, then session id.
    fn entries_for_lift(&self, lift: CanonicalLift) -> RepoResult<Vec<StoredEntry>>;
    /// Counts stored sessions.
    fn count_sessions(&self) -> RepoResult<u64>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    /// Constructs a repository from an initialized connection.
    ///
    /// # Errors
    /// - `RepoError::Schema` when `session`/`session_entry` are missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_session_schema(conn)?;
        Ok(Self { conn })
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn write_session(&self, session: &ParsedSession) -> RepoResult<SessionId> {
        self.conn.execute(
            "INSERT INTO session (session_timestamp, session_text) VALUES (?1, ?2);",
            params![
                session.date.map(format_session_timestamp),
                session.text.as_str()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn write_entry(&self, session_id: SessionId, entry: &LiftEntry) -> RepoResult<()> {
        let working = entry.working_set().ok_or_else(|| {
            RepoError::InvalidData(format!(
                "entry for `{}` has no sets",
                entry.lift().storage_label()
            ))
        })?;

        self.conn.execute(
            "INSERT INTO session_entry (
                session_id,
                session_entry_lift,
                session_entry_reps,
                session_entry_pounds
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                session_id,
                entry.lift().storage_label(),
                working.reps,
                working.weight.as_str(),
            ],
        )?;
        Ok(())
    }

    fn entries_for_lift(&self, lift: CanonicalLift) -> RepoResult<Vec<StoredEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                session.id AS session_id,
                session.session_timestamp AS session_timestamp,
                session_entry.session_entry_lift AS lift,
                session_entry.session_entry_reps AS reps,
                session_entry.session_entry_pounds AS pounds
             FROM session
             JOIN session_entry ON session.id = session_entry.session_id
             WHERE session_entry.session_entry_lift = ?1
             ORDER BY session.session_timestamp ASC, session.id ASC;",
        )?;

        let mut rows = stmt.query([lift.storage_label()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_stored_entry(row)?);
        }
        Ok(entries)
    }

    fn count_sessions(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM session;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative session count `{count}`")))
    }
}

/// Formats a session date the way it is persisted.
pub fn format_session_timestamp(date: DateTime<Utc>) -> String {
    date.format(SESSION_TIMESTAMP_FORMAT).to_string()
}

fn parse_stored_entry(row: &Row<'_>) -> RepoResult<StoredEntry> {
    let label: String = row.get("lift")?;
    let lift = CanonicalLift::from_storage_label(&label).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid lift `{label}` in session_entry.session_entry_lift"
        ))
    })?;

    let reps = match row.get::<_, Option<i64>>("reps")? {
        Some(value) => Some(u32::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid reps `{value}` in session_entry.session_entry_reps"
            ))
        })?),
        None => None,
    };

    Ok(StoredEntry {
        session_id: row.get("session_id")?,
        session_timestamp: row.get("session_timestamp")?,
        lift,
        reps,
        weight: read_text_or_number(row, "pounds")?,
    })
}

/// Reads a column that older databases may hold as TEXT, INTEGER or REAL.
fn read_text_or_number(row: &Row<'_>, column: &str) -> RepoResult<Option<String>> {
    use rusqlite::types::ValueRef;

    let value = match row.get_ref(column)? {
        ValueRef::Null => None,
        ValueRef::Integer(value) => Some(value.to_string()),
        ValueRef::Real(value) => Some(value.to_string()),
        ValueRef::Text(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => {
            return Err(RepoError::InvalidData(format!(
                "unexpected blob in session_entry.{column}"
            )));
        }
    };
    Ok(value)
}

fn ensure_session_schema(conn: &Connection) -> RepoResult<()> {
    const REQUIRED: &[(&str, &[&str])] = &[
        ("session", &["id", "session_timestamp", "session_text"]),
        (
            "session_entry",
            &[
                "session_id",
                "session_entry_lift",
                "session_entry_reps",
                "session_entry_pounds",
            ],
        ),
    ];

    for &(table, columns) in REQUIRED {
        if !table_exists(conn, table)? {
            return Err(SchemaError::MissingTable(table).into());
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(SchemaError::MissingColumn { table, column }.into());
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
