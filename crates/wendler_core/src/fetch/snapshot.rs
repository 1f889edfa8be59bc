//! Persisted note snapshot format.
//!
//! # Responsibility
//! - Decode/encode the `{"notes": [...]}` JSON shared by the remote service
//!   and snapshot files.
//! - Apply the client-side tag filter and convert notes to `RawNote`.
//!
//! # Invariants
//! - Tag comparison uses `config::normalize_tag` on both sides.
//! - An unparseable `created_at` becomes `None`; it never fails the snapshot.

use crate::config::normalize_tag;
use crate::fetch::{FetchResult, NoteSource};
use crate::model::session::RawNote;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Failure while reading a snapshot file.
#[derive(Debug)]
pub enum SnapshotError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode(serde_json::Error),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Decode(err) => write!(f, "invalid notes snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Decode(err) => Some(err),
        }
    }
}

/// Top-level snapshot document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSnapshot {
    pub notes: Vec<SnapshotNote>,
}

/// One note as stored by the service. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNote {
    /// RFC 3339 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NoteSnapshot {
    /// Decodes a snapshot document.
    pub fn from_json(body: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(body).map_err(SnapshotError::Decode)
    }

    /// Reads and decodes a snapshot file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&body)
    }

    /// Writes the snapshot as pretty-printed JSON.
    pub fn write_json(&self, writer: impl Write) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }

    /// Returns notes carrying `tag`, in document order.
    ///
    /// A blank `tag` matches nothing.
    pub fn notes_tagged(&self, tag: &str) -> Vec<RawNote> {
        let Some(target) = normalize_tag(tag) else {
            return Vec::new();
        };
        self.notes
            .iter()
            .filter(|note| note.has_tag(&target))
            .map(SnapshotNote::to_raw_note)
            .collect()
    }
}

impl SnapshotNote {
    /// Checks membership of an already-normalized tag.
    pub fn has_tag(&self, normalized_tag: &str) -> bool {
        self.tags
            .iter()
            .filter_map(|tag| normalize_tag(tag))
            .any(|tag| tag == normalized_tag)
    }

    pub fn to_raw_note(&self) -> RawNote {
        RawNote::new(
            parse_created_at(self.created_at.as_deref()),
            self.text.clone().unwrap_or_default(),
        )
    }
}

/// Parses an RFC 3339 `created_at` value into UTC.
pub fn parse_created_at(value: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = value.map(str::trim).filter(|raw| !raw.is_empty())?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(err) => {
            warn!("event=note_decode module=fetch status=warn field=created_at error={err}");
            None
        }
    }
}

/// Note source backed by a snapshot file on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NoteSource for SnapshotFile {
    fn fetch_notes(&self, tag: &str) -> FetchResult<Vec<RawNote>> {
        let snapshot = NoteSnapshot::read(&self.path)?;
        let notes = snapshot.notes_tagged(tag);
        info!(
            "event=notes_fetch module=fetch status=ok source=snapshot total={} matched={}",
            snapshot.notes.len(),
            notes.len()
        );
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_created_at, NoteSnapshot};
    use chrono::{TimeZone, Timelike, Utc};

    const SNAPSHOT: &str = r##"{
        "notes": [
            {"created_at": "2012-05-01T18:30:00.123Z", "text": "Squat\n5x185", "tags": ["Wendler"]},
            {"created_at": null, "text": "Bench\n5x135", "tags": ["#wendler", "gym"]},
            {"text": "groceries", "tags": ["todo"], "id": 7},
            {"created_at": "2012-05-03T08:00:00Z", "tags": ["wendler"]}
        ]
    }"##;

    #[test]
    fn notes_tagged_filters_case_insensitively() {
        let snapshot = NoteSnapshot::from_json(SNAPSHOT).unwrap();
        let notes = snapshot.notes_tagged("#Wendler");
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].text, "Squat\n5x185");
        assert_eq!(notes[1].created_at, None);
        assert_eq!(notes[2].text, "");
    }

    #[test]
    fn blank_tag_matches_nothing() {
        let snapshot = NoteSnapshot::from_json(SNAPSHOT).unwrap();
        assert!(snapshot.notes_tagged("  ").is_empty());
    }

    #[test]
    fn created_at_parses_fractional_utc_timestamps() {
        let parsed = parse_created_at(Some("2012-05-01T18:30:00.123Z")).unwrap();
        assert_eq!(parsed.date_naive(), Utc.with_ymd_and_hms(2012, 5, 1, 0, 0, 0).unwrap().date_naive());
        assert_eq!(parsed.nanosecond(), 123_000_000);
    }

    #[test]
    fn invalid_or_missing_created_at_is_absent() {
        assert_eq!(parse_created_at(None), None);
        assert_eq!(parse_created_at(Some("")), None);
        assert_eq!(parse_created_at(Some("yesterday")), None);
    }

    #[test]
    fn missing_notes_key_is_a_decode_error() {
        assert!(NoteSnapshot::from_json(r#"{"items": []}"#).is_err());
    }
}
