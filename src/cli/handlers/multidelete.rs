//! List, select, delete

use crate::cli::CliApp;
use crate::delete;
use crate::error::{Error, Result};
use crate::kubectl::{CommandRunner, Kubectl};
use crate::namespace;
use crate::resource::{self, ResourceRecord};
use crate::select_tui::Selector;
use std::collections::BTreeSet;
use std::io::Write;
use tracing::debug;

pub fn handle_multidelete(
    app: &CliApp,
    runner: &dyn CommandRunner,
    selector: &mut dyn Selector,
    out: &mut dyn Write,
) -> Result<()> {
    // Fails before anything external runs
    let namespace = namespace::analyze(&app.modifiers)?;

    let kubectl = Kubectl::new(app.config.kubectl.as_str(), runner);
    let records = resource::list(
        &kubectl,
        app.config.listing,
        &app.resource_type,
        &app.modifiers,
        namespace.as_deref(),
    )?;

    if records.is_empty() {
        return Err(Error::NoResources {
            resource_type: app.resource_type.clone(),
        });
    }

    let preselected: BTreeSet<usize> = if app.config.preselect_all {
        (0..records.len()).collect()
    } else {
        BTreeSet::new()
    };
    let label = format!("Select resources of type {} to delete", app.resource_type);
    let indices = selector.select(&label, &records, &preselected)?;

    let selected: Vec<ResourceRecord> = indices
        .iter()
        .filter_map(|&idx| records.get(idx).cloned())
        .collect();
    debug!(selected = selected.len(), of = records.len(), "selection made");

    let target_namespace = delete::dispatch_namespace(namespace.as_deref(), &selected);
    delete::delete(
        &kubectl,
        target_namespace.as_deref(),
        &app.resource_type,
        &selected,
        out,
    )?;

    Ok(())
}
