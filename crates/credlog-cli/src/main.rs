//! # credlog CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credlog_cli::logs::{run_logs, LogsArgs};
use credlog_cli::session_info::{run_session_info, SessionInfoArgs};
use credlog_log::{StoreConfig, STORAGE_DIR_ENV};

/// Inspect a credential holder's session log.
#[derive(Parser, Debug)]
#[command(name = "credlog", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding the log file.
    #[arg(long, global = true, env = STORAGE_DIR_ENV)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List stored records or show the views of one.
    Logs(LogsArgs),

    /// Decode a session-info message.
    #[command(name = "session-info")]
    SessionInfo(SessionInfoArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut config = StoreConfig::from_env();
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }
    tracing::debug!(log_path = %config.log_path().display(), "resolved log store");

    let result = match cli.command {
        Commands::Logs(args) => run_logs(&args, &config),
        Commands::SessionInfo(args) => run_session_info(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
