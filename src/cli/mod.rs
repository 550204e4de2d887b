//! Command-line interface for kubectl-multidelete
//!
//! This module is organized into submodules:
//! - `handlers`: the list, select, delete pipeline

mod handlers;

use handlers::*;

use crate::config::{Config, ListingFormat, DEFAULT_KUBECTL};
use crate::error::{Error, Result};
use crate::kubectl::SystemRunner;
use crate::select_tui::TerminalSelector;
use clap::Parser;
use std::io;

/// Interactively choose which resources of one type to delete
#[derive(Parser, Debug)]
#[command(name = "kubectl-multidelete")]
#[command(about = "Interactively choose which resources of one type to delete")]
#[command(version, long_about = None)]
pub struct Cli {
    /// kubectl command used for listing and deleting
    #[arg(long, value_name = "CMD", default_value = DEFAULT_KUBECTL)]
    pub kubectl: String,

    /// Open the checklist with every resource marked for deletion
    #[arg(long)]
    pub preselect_all: bool,

    /// Output form requested from `kubectl get`
    #[arg(long, value_enum, default_value_t = ListingFormat::Json)]
    pub output: ListingFormat,

    /// Verbose logging to stderr
    #[arg(long)]
    pub verbose: bool,

    /// Resource type to select from (pods, deployments, all, ...)
    #[arg(value_name = "RESOURCE_TYPE")]
    pub resource_type: String,

    /// Arguments forwarded to `kubectl get` (-l selector, -n namespace, ...)
    #[arg(
        value_name = "QUERY_MODIFIERS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub modifiers: Vec<String>,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            kubectl: cli.kubectl.clone(),
            preselect_all: cli.preselect_all,
            listing: cli.output,
            ..Config::default()
        }
    }
}

/// Main CLI application
pub struct CliApp {
    pub config: Config,
    pub resource_type: String,
    pub modifiers: Vec<String>,
}

impl CliApp {
    /// Create a new CLI application
    pub fn new(cli: &Cli) -> Result<Self> {
        let config = Config::from(cli);
        config.validate()?;

        if cli.resource_type.trim().is_empty() {
            return Err(Error::usage(
                "not enough arguments. Usage: kubectl multidelete <type> [-l selector]",
            ));
        }

        Ok(Self {
            config,
            resource_type: cli.resource_type.clone(),
            modifiers: cli.modifiers.clone(),
        })
    }

    /// Run the pipeline against the real kubectl and terminal
    pub fn run(&self) -> Result<()> {
        let mut selector = TerminalSelector::new(&self.config);
        handle_multidelete(self, &SystemRunner, &mut selector, &mut io::stdout())
    }
}

/// Main entry point for the CLI
pub fn run(cli: &Cli) -> Result<()> {
    let app = CliApp::new(cli)?;
    app.run()
}
