//! Run configuration for kubectl-multidelete
//!
//! Built once from the command line and handed to every stage by
//! reference. Nothing here is read from or written to disk.

use crate::error::{Error, Result};
use clap::ValueEnum;

/// Default external command used for listing and deleting
pub const DEFAULT_KUBECTL: &str = "kubectl";

/// Terminal height assumed when the real one cannot be queried
pub const DEFAULT_FALLBACK_HEIGHT: u16 = 24;

/// Terminal lines kept free for the label, footer and prompt line
pub const DEFAULT_RESERVED_LINES: u16 = 3;

/// How the listing stage asks kubectl to print resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ListingFormat {
    /// `get -ojson`; name and namespace come from each object
    #[default]
    Json,
    /// `get --no-headers`; name is the first column
    Text,
}

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Program invoked for `get` and `delete`
    pub kubectl: String,

    /// Open the selector with every item marked for deletion
    pub preselect_all: bool,

    /// Listing output form
    pub listing: ListingFormat,

    /// Height used when the terminal size is unknown
    pub fallback_height: u16,

    /// Lines of the terminal not available to the item window
    pub reserved_lines: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kubectl: DEFAULT_KUBECTL.to_string(),
            preselect_all: false,
            listing: ListingFormat::default(),
            fallback_height: DEFAULT_FALLBACK_HEIGHT,
            reserved_lines: DEFAULT_RESERVED_LINES,
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.kubectl.trim().is_empty() {
            return Err(Error::config_validation(
                "kubectl",
                "command must not be empty",
            ));
        }
        if self.fallback_height <= self.reserved_lines {
            return Err(Error::config_validation(
                "fallback_height",
                "must exceed the reserved lines",
            ));
        }
        Ok(())
    }
}
