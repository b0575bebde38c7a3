use crate::common::{is_ci_environment, Outcome};
use crate::errors::CliError;
use crate::project::Project;
use cireg_logger as logger;
use cireg_scan::Scanner;
use colored::Colorize;

/// List directories lacking a manifest; with `auto` (or under CI) write the skeletons
pub fn handle_scan(auto: bool, project: &Project) -> Result<Outcome, CliError> {
    let store = project.store_for_writing();
    let scanner = Scanner::from_config(project.root(), &store, project.config());
    let directories = project.config().scan_dirs(project.root());

    logger::step(&format!("Scanning {} directories", directories.len()));
    let report = scanner.scan(&directories);

    for name in &report.existing {
        logger::debug(&format!("{} already has a manifest", name));
    }
    for conflict in &report.conflicts {
        let reason = match &conflict.first {
            Some(first) => format!(
                "'{}' is already taken by {}",
                conflict.component_id,
                project.display_path(first)
            ),
            None => format!("'{}' is not a valid component id", conflict.component_id),
        };
        logger::warn(&format!(
            "Skipping {}: {}",
            project.display_path(&conflict.path),
            reason
        ));
    }

    if report.candidates.is_empty() {
        logger::success("Every scanned component has a manifest");
        return Ok(Outcome::Success);
    }

    println!("{}", "Components without a manifest:".bold());
    for candidate in &report.candidates {
        let m = &candidate.manifest;
        println!(
            "  {} {} ({})",
            m.component_id.cyan(),
            format!("[{}]", m.domain).dimmed(),
            project.display_path(&candidate.path)
        );
    }

    let write = auto || is_ci_environment();
    if !write {
        println!(
            "\nRun {} to create skeleton manifests",
            "cireg scan --auto".bold()
        );
        return Ok(Outcome::Success);
    }

    for candidate in &report.candidates {
        let path = store.write(&candidate.manifest)?;
        logger::success(&format!("Created {}", project.display_path(&path)));
    }
    logger::info(&format!(
        "Review the generated manifests in {} before committing",
        project.display_path(store.root())
    ));
    Ok(Outcome::Success)
}
