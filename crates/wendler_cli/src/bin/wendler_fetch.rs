//! Fetches tagged workout notes and writes them as a JSON snapshot.

use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use wendler_cli::{run_tool, CliError, FetchArgs};
use wendler_core::config::DEFAULT_PROMPT_ATTEMPTS;
use wendler_core::fetch::{prompt_hidden, prompt_non_empty};
use wendler_core::{CatchClient, Credentials, FetchError};

fn main() -> ExitCode {
    let args = FetchArgs::parse();
    let logging = args.logging.clone();
    run_tool("wendler-fetch", &logging, || run(args))
}

fn run(args: FetchArgs) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    // Prompts go to stderr so stdout stays a clean snapshot.
    let mut prompt_output = io::stderr();

    let username = match args.username {
        Some(username) => username,
        None => prompt_non_empty(
            &mut input,
            &mut prompt_output,
            "username",
            DEFAULT_PROMPT_ATTEMPTS,
        )?,
    };
    let password = match args.password {
        Some(password) => password,
        None => prompt_hidden("password", DEFAULT_PROMPT_ATTEMPTS)?,
    };

    let credentials = Credentials::new(username, password)?;
    let client = CatchClient::with_base_url(args.api_base_url, credentials)?;
    let snapshot = client.search(&args.tag)?;

    match args.output {
        Some(path) => {
            let file = File::create(&path).map_err(FetchError::Io)?;
            let mut writer = BufWriter::new(file);
            snapshot.write_json(&mut writer)?;
            writer.flush().map_err(FetchError::Io)?;
            eprintln!("wrote {} notes to {}", snapshot.notes.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            snapshot.write_json(&mut stdout)?;
            writeln!(stdout).map_err(FetchError::Io)?;
        }
    }
    Ok(())
}
