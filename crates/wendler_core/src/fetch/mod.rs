//! Note retrieval from the remote notes service or a local snapshot.
//!
//! # Responsibility
//! - Define the `NoteSource` seam consumed by the import flow.
//! - Map transport, status and decoding failures into `FetchError`.
//!
//! # Invariants
//! - Every call is a single attempt; nothing is retried.
//! - Credentials are never included in error messages or logs.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod catch_client;
pub mod credentials;
pub mod snapshot;

pub use catch_client::CatchClient;
pub use credentials::{prompt_hidden, prompt_non_empty, Credentials};
pub use snapshot::{NoteSnapshot, SnapshotError, SnapshotFile, SnapshotNote};

use crate::model::session::RawNote;

pub type FetchResult<T> = Result<T, FetchError>;

/// Failure while obtaining notes.
#[derive(Debug)]
pub enum FetchError {
    /// Username or password left empty.
    CredentialMissing(&'static str),
    /// The service answered with a non-200 status.
    Authentication { status: u16, reason: String },
    /// Transport-level failure.
    Network(reqwest::Error),
    /// Response or snapshot body is not the expected JSON shape.
    Decode(serde_json::Error),
    /// Local snapshot or prompt I/O failed.
    Io(std::io::Error),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CredentialMissing(field) => write!(f, "{field} is required"),
            Self::Authentication { status, reason } => {
                write!(f, "{status} response from server. Reason: {reason}")
            }
            Self::Network(err) => write!(f, "network error: {err}"),
            Self::Decode(err) => write!(f, "invalid notes payload: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CredentialMissing(_) | Self::Authentication { .. } => None,
            Self::Network(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<SnapshotError> for FetchError {
    fn from(value: SnapshotError) -> Self {
        match value {
            SnapshotError::Io { source, .. } => Self::Io(source),
            SnapshotError::Decode(err) => Self::Decode(err),
        }
    }
}

/// Anything that can produce the raw notes carrying a tag.
pub trait NoteSource {
    /// Returns notes tagged with `tag` (compared after normalization).
    fn fetch_notes(&self, tag: &str) -> FetchResult<Vec<RawNote>>;
}
