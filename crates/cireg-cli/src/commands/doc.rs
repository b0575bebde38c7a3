use crate::common::Outcome;
use crate::errors::CliError;
use crate::project::Project;
use cireg_codegen::docs;
use cireg_logger as logger;
use cireg_manifest::DependencyGraph;
use std::path::PathBuf;

/// Regenerate the per-component pages and the index
///
/// `out` is resolved against the project root; without it the configured
/// docs directory is used. Existing pages are overwritten.
pub fn handle_doc(out: Option<PathBuf>, project: &Project) -> Result<Outcome, CliError> {
    let manifests = project.load_manifests()?;
    let graph = DependencyGraph::build(&manifests);

    for id in graph.dangling() {
        logger::warn(&format!("Dependency '{}' has no manifest", id));
    }

    let documentation = docs::generate(&manifests, &graph)?;
    let out_dir = match out {
        Some(dir) => project.root().join(dir),
        None => project.config().docs_dir(project.root()),
    };

    logger::spinner_start("Writing documentation");
    let written = match documentation.write_to(&out_dir) {
        Ok(written) => written,
        Err(e) => {
            logger::spinner_error("Failed to write documentation");
            return Err(e.into());
        }
    };
    logger::spinner_success(&format!(
        "Wrote {} pages to {}",
        written.len(),
        project.display_path(&out_dir)
    ));
    Ok(Outcome::Success)
}
