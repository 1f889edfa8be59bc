//! Parses a notes snapshot and stores the sessions in SQLite.

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use wendler_cli::{run_tool, CliError, ImportArgs};
use wendler_core::db::open_db;
use wendler_core::{import_sessions, parse_notes, FetchError, NoteSource, SnapshotFile};

fn main() -> ExitCode {
    let args = ImportArgs::parse();
    let logging = args.logging.clone();
    run_tool("wendler-import", &logging, || run(args))
}

fn run(args: ImportArgs) -> Result<(), CliError> {
    let notes = SnapshotFile::new(&args.file).fetch_notes(&args.tag)?;
    let batch = parse_notes(notes);

    if args.dry_run {
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &batch.sessions)?;
        writeln!(stdout).map_err(FetchError::Io)?;
        return Ok(());
    }

    let mut conn = open_db(&args.output)?;
    let summary = import_sessions(&mut conn, &batch.sessions)?;
    println!(
        "imported {} sessions ({} lift entries) into {}; {} malformed set lines skipped",
        summary.sessions_written,
        summary.entries_written,
        args.output.display(),
        batch.malformed_lines
    );
    Ok(())
}
