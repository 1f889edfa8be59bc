//! Writes estimated one-rep-max series per lift from the session database.

use clap::Parser;
use std::process::ExitCode;
use wendler_cli::{run_tool, CliError, ReportArgs};
use wendler_core::db::open_existing_db;
use wendler_core::{ReportService, SqliteSessionRepository};

fn main() -> ExitCode {
    let args = ReportArgs::parse();
    let logging = args.logging.clone();
    run_tool("wendler-report", &logging, || run(args))
}

fn run(args: ReportArgs) -> Result<(), CliError> {
    let conn = open_existing_db(&args.input)?;
    let repo = SqliteSessionRepository::try_new(&conn)?;
    let files = ReportService::new(repo).write_reports(&args.output_dir)?;
    for file in files {
        println!("{}: {} points", file.path.display(), file.lines);
    }
    Ok(())
}
