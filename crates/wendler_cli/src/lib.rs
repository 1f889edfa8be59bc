//! Shared plumbing for the `wendler-fetch`, `wendler-import` and
//! `wendler-report` entry points.
//!
//! # Responsibility
//! - Declare command-line arguments for the three tools.
//! - Bootstrap logging from flags/environment.
//! - Map fatal errors to a stderr diagnostic and a non-zero exit status.

use clap::{Args, Parser};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;
use wendler_core::config::{DEFAULT_API_BASE_URL, DEFAULT_DB_FILE, DEFAULT_TAG};
use wendler_core::db::DbError;
use wendler_core::{default_log_level, init_logging, FetchError, RepoError, ReportError};

/// Stderr logging stays quiet unless asked otherwise.
const DEFAULT_STDERR_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Args)]
pub struct LoggingArgs {
    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "WENDLER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (default: log to stderr)
    #[arg(long, env = "WENDLER_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl LoggingArgs {
    /// Initializes process logging from these flags.
    pub fn init(&self) -> Result<(), String> {
        let level = match (&self.log_level, &self.log_dir) {
            (Some(level), _) => level.as_str(),
            (None, Some(_)) => default_log_level(),
            (None, None) => DEFAULT_STDERR_LOG_LEVEL,
        };
        init_logging(level, self.log_dir.as_deref())
    }
}

/// Fetch workout notes tagged for the log from the notes service.
#[derive(Debug, Parser)]
#[command(name = "wendler-fetch", version)]
pub struct FetchArgs {
    /// Tag to search for
    #[arg(short, long, default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Username (prompted when absent)
    #[arg(short, long, env = "WENDLER_USERNAME")]
    pub username: Option<String>,

    /// Password (prompted when absent)
    #[arg(long, env = "WENDLER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Base URL of the notes service API
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Write the notes snapshot here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Generate a structured SQLite database from workout notes.
#[derive(Debug, Parser)]
#[command(name = "wendler-import", version)]
pub struct ImportArgs {
    /// JSON notes snapshot to read
    #[arg(short, long)]
    pub file: PathBuf,

    /// SQLite database file to write
    #[arg(short, long, default_value = DEFAULT_DB_FILE)]
    pub output: PathBuf,

    /// Only notes carrying this tag are imported
    #[arg(short, long, default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Parse and print sessions as JSON without writing the database
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Write estimated one-rep-max series per lift from the SQLite database.
#[derive(Debug, Parser)]
#[command(name = "wendler-report", version)]
pub struct ReportArgs {
    /// SQLite database file to read
    #[arg(short, long, default_value = DEFAULT_DB_FILE)]
    pub input: PathBuf,

    /// Directory receiving one `<lift>.txt` per lift
    #[arg(short = 'd', long, default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Fatal error of one tool run.
#[derive(Debug)]
pub enum CliError {
    Fetch(FetchError),
    Db(DbError),
    Repo(RepoError),
    Report(ReportError),
    Output(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Report(err) => write!(f, "{err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fetch(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Report(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

impl From<FetchError> for CliError {
    fn from(value: FetchError) -> Self {
        Self::Fetch(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ReportError> for CliError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Output(value)
    }
}

/// Runs one tool body: initializes logging, then maps failures to exit codes.
pub fn run_tool<F>(tool: &'static str, logging: &LoggingArgs, body: F) -> ExitCode
where
    F: FnOnce() -> Result<(), CliError>,
{
    if let Err(err) = logging.init() {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    match body() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=tool_exit module=cli status=error tool={tool} error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchArgs, ImportArgs, ReportArgs};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn fetch_defaults_to_wendler_tag() {
        let args = FetchArgs::try_parse_from(["wendler-fetch"]).unwrap();
        assert_eq!(args.tag, "#wendler");
        assert_eq!(args.api_base_url, "https://api.catch.com/v2");
        assert!(args.output.is_none());
    }

    #[test]
    fn import_requires_file_and_defaults_output() {
        assert!(ImportArgs::try_parse_from(["wendler-import"]).is_err());

        let args = ImportArgs::try_parse_from(["wendler-import", "-f", "notes.json"]).unwrap();
        assert_eq!(args.file, PathBuf::from("notes.json"));
        assert_eq!(args.output, PathBuf::from("output.db"));
        assert!(!args.dry_run);
    }

    #[test]
    fn report_defaults_input_and_output_dir() {
        let args = ReportArgs::try_parse_from(["wendler-report", "--input", "lifts.db"]).unwrap();
        assert_eq!(args.input, PathBuf::from("lifts.db"));
        assert_eq!(args.output_dir, PathBuf::from("."));
    }
}
