//! One-rep-max report service.
//!
//! # Responsibility
//! - Turn stored working sets into an estimated one-rep-max time series.
//! - Write one `<lift>.txt` file per canonical lift.
//!
//! # Invariants
//! - Estimate is `weight * reps * 0.0333 + weight`, reported as its floor.
//! - Rows with unknown reps, no date, or no leading numeric weight are skipped.
//! - Output lines are `YYYY-MM-DD,<integer>` in timestamp order.

use crate::model::lift::CanonicalLift;
use crate::repo::session_repo::{RepoError, RepoResult, SessionRepository, StoredEntry};
use chrono::NaiveDate;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Per-rep multiplier of the estimate.
pub const ONE_REP_MAX_FACTOR: f64 = 0.0333;

static LEADING_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)").expect("valid leading number regex"));

/// Report-layer error.
#[derive(Debug)]
pub enum ReportError {
    Repo(RepoError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<RepoError> for ReportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// One point of a lift's estimated one-rep-max series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportPoint {
    pub date: NaiveDate,
    pub estimated_one_rep_max: f64,
}

impl ReportPoint {
    /// Estimate rounded down to whole units.
    pub fn rounded(&self) -> i64 {
        self.estimated_one_rep_max.floor() as i64
    }

    /// Renders the `YYYY-MM-DD,<integer>` report line.
    pub fn to_line(&self) -> String {
        format!("{},{}", self.date.format("%Y-%m-%d"), self.rounded())
    }
}

/// A report file written for one lift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub lift: CanonicalLift,
    pub path: PathBuf,
    pub lines: usize,
}

/// Computes `weight * reps * 0.0333 + weight`.
pub fn estimated_one_rep_max(weight: f64, reps: u32) -> f64 {
    weight * f64::from(reps) * ONE_REP_MAX_FACTOR + weight
}

/// Reads the leading decimal number of a stored weight (`"185 lbs"` -> 185).
pub fn parse_weight_value(text: &str) -> Option<f64> {
    LEADING_NUMBER_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Extracts the calendar date of a stored session timestamp.
pub fn session_date(timestamp: &str) -> Option<NaiveDate> {
    let date_part = timestamp.trim().split([' ', 'T']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Report facade over repository implementations.
pub struct ReportService<R: SessionRepository> {
    repo: R,
}

impl<R: SessionRepository> ReportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the estimated one-rep-max series for one lift.
    pub fn query(&self, lift: CanonicalLift) -> RepoResult<Vec<ReportPoint>> {
        let entries = self.repo.entries_for_lift(lift)?;
        Ok(entries.iter().filter_map(report_point).collect())
    }

    /// Writes `<lift>.txt` for every canonical lift into `output_dir`.
    pub fn write_reports(&self, output_dir: &Path) -> Result<Vec<ReportFile>, ReportError> {
        std::fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::with_capacity(CanonicalLift::ALL.len());
        for lift in CanonicalLift::ALL {
            let points = self.query(lift)?;
            let path = output_dir.join(format!("{}.txt", lift.identifier()));
            let content: String = points
                .iter()
                .map(|point| format!("{}\n", point.to_line()))
                .collect();
            std::fs::write(&path, content).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;

            info!(
                "event=report_write module=service status=ok lift={} lines={}",
                lift.identifier(),
                points.len()
            );
            files.push(ReportFile {
                lift,
                path,
                lines: points.len(),
            });
        }
        Ok(files)
    }
}

fn report_point(entry: &StoredEntry) -> Option<ReportPoint> {
    debug!(
        "event=report_row module=service session_id={} lift={} reps={:?} weight={:?}",
        entry.session_id,
        entry.lift.identifier(),
        entry.reps,
        entry.weight
    );

    let Some(date) = entry.session_timestamp.as_deref().and_then(session_date) else {
        warn!(
            "event=report_row module=service status=skip reason=missing_date session_id={}",
            entry.session_id
        );
        return None;
    };
    let Some(reps) = entry.reps else {
        warn!(
            "event=report_row module=service status=skip reason=unknown_reps session_id={}",
            entry.session_id
        );
        return None;
    };
    let Some(weight) = entry.weight.as_deref().and_then(parse_weight_value) else {
        warn!(
            "event=report_row module=service status=skip reason=unreadable_weight session_id={}",
            entry.session_id
        );
        return None;
    };

    Some(ReportPoint {
        date,
        estimated_one_rep_max: estimated_one_rep_max(weight, reps),
    })
}

#[cfg(test)]
mod tests {
    use super::{estimated_one_rep_max, parse_weight_value, session_date, ReportPoint};
    use chrono::NaiveDate;

    #[test]
    fn estimate_for_185_by_3_floors_to_203() {
        let value = estimated_one_rep_max(185.0, 3);
        assert!((value - 203.4815).abs() < 1e-9);
        let point = ReportPoint {
            date: NaiveDate::from_ymd_opt(2012, 5, 1).unwrap(),
            estimated_one_rep_max: value,
        };
        assert_eq!(point.rounded(), 203);
        assert_eq!(point.to_line(), "2012-05-01,203");
    }

    #[test]
    fn zero_reps_estimate_is_the_weight() {
        assert_eq!(estimated_one_rep_max(225.0, 0), 225.0);
    }

    #[test]
    fn weight_value_reads_leading_number() {
        assert_eq!(parse_weight_value("185"), Some(185.0));
        assert_eq!(parse_weight_value(" 92.5kg"), Some(92.5));
        assert_eq!(parse_weight_value("185 lbs"), Some(185.0));
        assert_eq!(parse_weight_value("bar"), None);
        assert_eq!(parse_weight_value(""), None);
    }

    #[test]
    fn session_date_accepts_stored_and_rfc3339_layouts() {
        let expected = NaiveDate::from_ymd_opt(2012, 5, 1);
        assert_eq!(session_date("2012-05-01 18:30:00.123000"), expected);
        assert_eq!(session_date("2012-05-01T18:30:00Z"), expected);
        assert_eq!(session_date("not a date"), None);
    }
}
