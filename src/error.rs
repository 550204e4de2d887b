//! Error handling for kubectl-multidelete
//!
//! Every stage of the pipeline returns these errors; only the binary's
//! entry point turns them into a message and an exit status.

use std::io;
use thiserror::Error;

/// Result type alias for multidelete operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for multidelete operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON deserialization of a listing failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command line usage
    #[error("{message}")]
    Usage { message: String },

    /// Query modifiers asked for every namespace at once
    #[error("{flag} is not supported: a single delete call cannot span namespaces")]
    AllNamespacesUnsupported { flag: String },

    /// A namespace flag was given without its value
    #[error("{flag} requires a namespace value")]
    MissingNamespaceValue { flag: String },

    /// The external CLI exited non-zero (or could not be started)
    #[error("running {command}: {reason}\n{output}")]
    ExternalProcess {
        command: String,
        output: String,
        reason: String,
    },

    /// The listing returned nothing to choose from
    #[error("No objects of type {resource_type} found")]
    NoResources { resource_type: String },

    /// The operator aborted the selection
    #[error("Selection cancelled, nothing was deleted")]
    SelectionCancelled,

    /// The terminal failed while selecting
    #[error("Selecting objects: {reason}")]
    Selection { reason: String },

    /// The batched delete call failed
    #[error("Deleting objects with {command}: {reason}")]
    DeletionFailed { command: String, reason: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {field} - {reason}")]
    ConfigValidation { field: String, reason: String },
}

impl Error {
    /// Create a usage error
    pub fn usage<S: Into<String>>(message: S) -> Self {
        Error::Usage {
            message: message.into(),
        }
    }

    /// Create a selection error from a terminal failure
    pub fn selection<S: Into<String>>(reason: S) -> Self {
        Error::Selection {
            reason: reason.into(),
        }
    }

    /// Create a config validation error
    pub fn config_validation<S: Into<String>>(field: S, reason: S) -> Self {
        Error::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error stems from how the tool was invoked
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Error::Usage { .. }
                | Error::AllNamespacesUnsupported { .. }
                | Error::MissingNamespaceValue { .. }
                | Error::ConfigValidation { .. }
        )
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_usage() { 2 } else { 1 }
    }

    /// Get the error category for logging purposes
    pub fn category(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Usage { .. }
            | Error::AllNamespacesUnsupported { .. }
            | Error::MissingNamespaceValue { .. } => "usage",
            Error::ConfigValidation { .. } => "config",
            Error::ExternalProcess { .. } => "external",
            Error::NoResources { .. } => "empty",
            Error::SelectionCancelled => "cancelled",
            Error::Selection { .. } => "selection",
            Error::DeletionFailed { .. } => "deletion",
        }
    }
}
