use crate::common::Outcome;
use crate::errors::CliError;
use crate::project::Project;
use cireg_logger as logger;
use cireg_manifest::{is_valid_component_id, slugify, IntegrationManifest};
use colored::Colorize;

/// Write a minimal manifest for `component_id`
///
/// An existing manifest is left alone unless `force` is set.
pub fn handle_generate(
    component_id: Option<String>,
    force: bool,
    project: &Project,
) -> Result<Outcome, CliError> {
    let Some(requested) = component_id else {
        return Err(CliError::MissingComponentId);
    };

    let id = slugify(requested.trim());
    if id != requested {
        logger::warn(&format!("Using component id '{}' for '{}'", id, requested));
    }
    if !is_valid_component_id(&id) {
        return Err(CliError::InvalidComponentId(requested));
    }

    let store = project.store_for_writing();
    if store.contains(&id) && !force {
        println!(
            "{} manifest for {} already exists, nothing to do (use --force to overwrite)",
            "skip".yellow(),
            id.cyan()
        );
        return Ok(Outcome::Success);
    }

    let manifest = IntegrationManifest::minimal(&id, project.config().default_owner());
    let path = store.write(&manifest)?;
    logger::success(&format!("Created {}", project.display_path(&path)));
    Ok(Outcome::Success)
}
