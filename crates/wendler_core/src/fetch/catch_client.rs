//! Blocking HTTP client for the remote notes search API.
//!
//! # Responsibility
//! - Build the authenticated `GET /search?full=1&q=<tag>` request.
//! - Decode the `{"notes": [...]}` response body.
//!
//! # Invariants
//! - Any status other than 200 is an `Authentication` failure.
//! - One request per call; no retries, no timeouts beyond client defaults.

use crate::config::DEFAULT_API_BASE_URL;
use crate::fetch::credentials::Credentials;
use crate::fetch::snapshot::NoteSnapshot;
use crate::fetch::{FetchError, FetchResult, NoteSource};
use crate::model::session::RawNote;
use log::{error, info};
use reqwest::blocking::{Client, Request};
use reqwest::StatusCode;
use std::time::Instant;

/// Client for the notes service search endpoint.
pub struct CatchClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl CatchClient {
    /// Creates a client against the default service endpoint.
    pub fn new(credentials: Credentials) -> FetchResult<Self> {
        Self::with_base_url(DEFAULT_API_BASE_URL, credentials)
    }

    /// Creates a client against `base_url` (e.g. `https://host/v2`).
    pub fn with_base_url(base_url: impl Into<String>, credentials: Credentials) -> FetchResult<Self> {
        let http = Client::builder().build().map_err(FetchError::Network)?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Builds the search request without sending it.
    pub fn build_search_request(&self, tag: &str) -> FetchResult<Request> {
        self.http
            .get(format!("{}/search", self.base_url))
            .query(&[("full", "1"), ("q", tag)])
            .basic_auth(self.credentials.username(), Some(self.credentials.password()))
            .build()
            .map_err(FetchError::Network)
    }

    /// Runs the search and returns the decoded snapshot.
    pub fn search(&self, tag: &str) -> FetchResult<NoteSnapshot> {
        let started_at = Instant::now();
        info!("event=notes_fetch module=fetch status=start source=remote");

        let request = self.build_search_request(tag)?;
        let response = self.http.execute(request).map_err(|err| {
            error!(
                "event=notes_fetch module=fetch status=error source=remote duration_ms={} error_code=network error={}",
                started_at.elapsed().as_millis(),
                err
            );
            FetchError::Network(err)
        })?;

        let status = response.status();
        let body = response.text().map_err(FetchError::Network)?;
        let snapshot = decode_search_response(status, &body);
        match &snapshot {
            Ok(decoded) => info!(
                "event=notes_fetch module=fetch status=ok source=remote duration_ms={} notes={}",
                started_at.elapsed().as_millis(),
                decoded.notes.len()
            ),
            Err(err) => error!(
                "event=notes_fetch module=fetch status=error source=remote duration_ms={} http_status={} error={}",
                started_at.elapsed().as_millis(),
                status.as_u16(),
                err
            ),
        }
        snapshot
    }
}

impl NoteSource for CatchClient {
    fn fetch_notes(&self, tag: &str) -> FetchResult<Vec<RawNote>> {
        Ok(self.search(tag)?.notes_tagged(tag))
    }
}

/// Maps a search response status and body to a snapshot.
pub fn decode_search_response(status: StatusCode, body: &str) -> FetchResult<NoteSnapshot> {
    if status != StatusCode::OK {
        return Err(FetchError::Authentication {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown").to_string(),
        });
    }
    NoteSnapshot::from_json(body).map_err(FetchError::from)
}

#[cfg(test)]
mod tests {
    use super::{decode_search_response, CatchClient};
    use crate::fetch::{Credentials, FetchError};
    use reqwest::header::AUTHORIZATION;
    use reqwest::StatusCode;

    fn client() -> CatchClient {
        let credentials = Credentials::new("user", "pass").unwrap();
        CatchClient::with_base_url("https://notes.example.com/v2/", credentials).unwrap()
    }

    #[test]
    fn search_request_encodes_tag_and_sets_basic_auth() {
        let request = client().build_search_request("#wendler").unwrap();
        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://notes.example.com/v2/search?full=1&q=%23wendler"
        );
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Basic dXNlcjpwYXNz"
        );
    }

    #[test]
    fn non_ok_status_is_authentication_error() {
        let err = decode_search_response(StatusCode::UNAUTHORIZED, "").unwrap_err();
        match err {
            FetchError::Authentication { status, reason } => {
                assert_eq!(status, 401);
                assert_eq!(reason, "Unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ok_status_decodes_notes() {
        let body = r#"{"notes": [{"created_at": "2012-01-02T03:04:05.000Z", "text": "Squat\n5x185", "tags": ["wendler"]}]}"#;
        let snapshot = decode_search_response(StatusCode::OK, body).unwrap();
        assert_eq!(snapshot.notes.len(), 1);
    }

    #[test]
    fn ok_status_with_bad_body_is_decode_error() {
        let err = decode_search_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
