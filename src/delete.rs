//! Batched deletion of the selected resources
//!
//! Rebuilds one `kubectl delete` call from the selection, putting back the
//! namespace and resource type the listing factored out. kubectl does not
//! delete atomically, so on failure its raw output is the only record of
//! what was actually removed.

use crate::error::{Error, Result};
use crate::kubectl::{CommandOutput, Kubectl};
use crate::resource::{self, ResourceRecord};
use std::io::Write;
use tracing::debug;

/// Namespace to pin the delete call to
///
/// An explicit namespace from the query wins. Otherwise, when every selected
/// record reports the same non-empty namespace, that one is used so the call
/// cannot drift if the ambient context changes in between.
pub fn dispatch_namespace(analyzed: Option<&str>, selected: &[ResourceRecord]) -> Option<String> {
    if let Some(namespace) = analyzed.filter(|ns| !ns.is_empty()) {
        return Some(namespace.to_string());
    }

    let first = selected.first()?.namespace.as_str();
    if !first.is_empty() && selected.iter().all(|r| r.namespace == first) {
        Some(first.to_string())
    } else {
        None
    }
}

/// Arguments for the delete call
///
/// The type is left out for `all` and comma-separated type lists, whose
/// names are already type-qualified.
pub fn delete_args(
    namespace: Option<&str>,
    resource_type: &str,
    selected: &[ResourceRecord],
) -> Vec<String> {
    let mut args = vec!["delete".to_string()];
    if let Some(namespace) = namespace.filter(|ns| !ns.is_empty()) {
        args.push("-n".to_string());
        args.push(namespace.to_string());
    }
    if !resource::is_multi_type(resource_type) {
        args.push(resource_type.to_string());
    }
    args.extend(selected.iter().map(|r| r.name.clone()));
    args
}

/// Delete every selected record in one kubectl call
///
/// The invocation is echoed to `out` before it runs and kubectl's combined
/// output after, whether it succeeded or not. Returns `None` when there was
/// nothing to delete.
pub fn delete(
    kubectl: &Kubectl,
    namespace: Option<&str>,
    resource_type: &str,
    selected: &[ResourceRecord],
    out: &mut dyn Write,
) -> Result<Option<CommandOutput>> {
    if selected.is_empty() {
        writeln!(out, "Nothing to delete")?;
        return Ok(None);
    }

    let args = delete_args(namespace, resource_type, selected);
    let command = kubectl.command_line(&args).to_string();
    writeln!(out, "Running: {}", command)?;
    debug!(count = selected.len(), "deleting selected resources");

    let output = kubectl.run(&args).map_err(|e| Error::DeletionFailed {
        command: command.clone(),
        reason: e.to_string(),
    })?;
    write!(out, "{}", output.combined())?;
    out.flush()?;

    if output.is_success() {
        Ok(Some(output))
    } else {
        Err(Error::DeletionFailed {
            command,
            reason: output.status(),
        })
    }
}
