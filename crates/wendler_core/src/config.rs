//! Shared defaults for the fetch/import/report tools.
//!
//! # Responsibility
//! - Keep default tag, database file and API endpoint in one place.
//! - Normalize tags so server queries and client-side filters agree.

/// Tag used when the caller does not pass one.
pub const DEFAULT_TAG: &str = "#wendler";
/// SQLite file written by import and read by report.
pub const DEFAULT_DB_FILE: &str = "output.db";
/// Base URL of the remote notes service.
pub const DEFAULT_API_BASE_URL: &str = "https://api.catch.com/v2";
/// Interactive credential prompts give up after this many blank answers.
pub const DEFAULT_PROMPT_ATTEMPTS: u32 = 3;

/// Normalizes one tag value: trimmed, leading `#` removed, lowercase.
///
/// Returns `None` for blank tags.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim().trim_start_matches('#').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}
