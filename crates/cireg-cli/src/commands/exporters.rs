use crate::common::Outcome;
use crate::errors::CliError;
use crate::project::Project;
use cireg_codegen::{ExporterGenerator, ExporterOutcome};
use cireg_logger as logger;
use colored::Colorize;

/// Generate a metrics exporter for every manifest declaring a namespace
///
/// Existing exporter files are never overwritten, so running this twice is safe.
pub fn handle_exporters(project: &Project) -> Result<Outcome, CliError> {
    let manifests = project.load_manifests()?;
    let generator = ExporterGenerator::new(project.config().exporters_dir(project.root()));

    let mut written = 0;
    let mut existing = 0;
    for (id, outcome) in generator.generate_all(&manifests)? {
        match outcome {
            ExporterOutcome::Written(path) => {
                written += 1;
                println!(
                    "{} {} -> {}",
                    "generated".green(),
                    id.cyan(),
                    project.display_path(&path)
                );
            }
            ExporterOutcome::Exists(path) => {
                existing += 1;
                println!(
                    "{} {} ({} exists)",
                    "skip".yellow(),
                    id,
                    project.display_path(&path)
                );
            }
            ExporterOutcome::NoNamespace => {
                logger::debug(&format!("{} declares no metrics namespace", id));
            }
        }
    }

    if written == 0 && existing == 0 {
        logger::warn("No manifest declares a metrics namespace; no exporters generated");
    } else {
        logger::success(&format!(
            "{} exporter(s) generated, {} already present",
            written, existing
        ));
    }
    Ok(Outcome::Success)
}
