//! nutriseed - seed the fitness app's document store and query the
//! nutrition APIs it relies on.
//!
//! Run `nutriseed --help` for the list of commands.

mod cli;
mod commands;

use std::io;

use clap::Parser;
use tracing::{debug, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

/// Environment variable naming a directory for daily log files
const LOG_DIR_ENV: &str = "NUTRISEED_LOG_DIR";

/// Log file prefix inside the log directory
const LOG_FILE_PREFIX: &str = "nutriseed.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so command output on stdout stays clean. When
/// `NUTRISEED_LOG_DIR` is set a daily-rotated file is written as well; the
/// returned guard must live until exit so buffered lines are flushed.
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match std::env::var(LOG_DIR_ENV).ok().filter(|d| !d.trim().is_empty()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = init_tracing();

    // Argument errors exit with 1 like every other failure; help and
    // version requests keep clap's own exit.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            error!(kind = ?e.kind(), "Invalid arguments");
            let _ = e.print();
            std::process::exit(1);
        }
    };

    debug!(command = ?cli.command, "Running command");
    let result = commands::run(cli.command).await;

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
