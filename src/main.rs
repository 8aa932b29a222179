//! `timecard` binary: track time on tasks from the command line.
//!
//! With a command, runs it once and exits non-zero when it fails. Without
//! one, reads commands from standard input until `exit`, `quit`, or end of
//! input.

use camino::Utf8PathBuf;
use clap::Parser;
use mockable::DefaultClock;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;
use timecard::{
    cli::{Outcome, Session, Shell},
    config::Settings,
    tracking::{adapters::json::JsonFileStore, services::TrackingService},
};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "TIMECARD_LOG";

/// Track time spent on tasks nested under projects.
#[derive(Debug, Parser)]
#[command(name = "timecard", version, about)]
struct Cli {
    /// Settings file to load instead of the default.
    #[arg(long, value_name = "FILE")]
    config: Option<Utf8PathBuf>,
    /// Directory holding the tracker document.
    #[arg(long, value_name = "DIR")]
    data_dir: Option<Utf8PathBuf>,
    /// Command and arguments to run once. Starts a prompt when omitted.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() -> eyre::Result<ExitCode> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        settings = settings.with_data_dir(data_dir);
    }
    init_logging(&settings.log_level);

    let store = Arc::new(JsonFileStore::open(&settings.data_dir)?);
    let service = TrackingService::new(store, Arc::new(DefaultClock));
    let mut shell = Shell::new(Session::new(service, settings));

    if cli.command.is_empty() {
        shell.repl()?;
        return Ok(ExitCode::SUCCESS);
    }
    Ok(match shell.run(&cli.command)? {
        Outcome::Success => ExitCode::SUCCESS,
        Outcome::Failure => ExitCode::FAILURE,
    })
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}
