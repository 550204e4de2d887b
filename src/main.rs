//! kubectl-multidelete - pick which resources of one type to delete
//!
//! This is the entry point for the command-line application. It sets up
//! logging, runs the pipeline and maps errors to exit statuses.

use clap::Parser;
use multidelete::cli::{self, Cli};
use multidelete::error::Error;
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise warn, or debug with --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(&cli) {
        tracing::debug!(category = e.category(), "run failed");
        match e {
            Error::NoResources { .. } | Error::SelectionCancelled => eprintln!("{}", e),
            _ => eprintln!("Error: {}", e),
        }
        process::exit(e.exit_code());
    }
}
