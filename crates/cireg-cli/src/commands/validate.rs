use crate::common::Outcome;
use crate::errors::CliError;
use crate::project::Project;
use cireg_logger as logger;
use cireg_manifest::{ManifestStore, Schema, ValidationIssue};
use colored::Colorize;
use std::collections::HashMap;
use std::path::Path;

/// Per-file result of a validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub file: String,
    pub issues: Vec<String>,
}

impl FileResult {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Validate every manifest in the store against the schema
///
/// Unparseable files and duplicate ids count as invalid, and nothing stops
/// at the first bad file.
pub fn handle_validate(project: &Project) -> Result<Outcome, CliError> {
    let store = project.open_store()?;
    let schema = project.load_schema()?;
    let results = validate_store(&store, &schema)?;

    if results.is_empty() {
        logger::warn(&format!(
            "No manifests found in {}",
            project.display_path(store.root())
        ));
        return Ok(Outcome::Success);
    }

    for result in &results {
        if result.is_valid() {
            println!("{} {}", "\u{2714}".green().bold(), result.file);
        } else {
            println!("{} {}", "\u{2717}".red().bold(), result.file.red());
            for issue in &result.issues {
                println!("    {}", issue);
            }
        }
    }

    let invalid = results.iter().filter(|r| !r.is_valid()).count();
    println!();
    if invalid == 0 {
        logger::success(&format!("All {} manifests are valid", results.len()));
    } else {
        logger::error(&format!(
            "{} of {} manifests are invalid",
            invalid,
            results.len()
        ));
    }
    Ok(Outcome::from_failures(invalid))
}

pub fn validate_store(
    store: &ManifestStore,
    schema: &Schema,
) -> Result<Vec<FileResult>, CliError> {
    let documents = store.load_documents()?;
    let mut results: Vec<FileResult> = Vec::new();

    for failure in &documents.failures {
        results.push(FileResult {
            file: failure.file_name(),
            issues: vec![failure.error.to_string()],
        });
    }

    let mut seen: HashMap<String, String> = HashMap::new();
    for doc in &documents.loaded {
        let file = file_name(&doc.path);
        let mut issues: Vec<String> = schema
            .validate(&doc.value)
            .errors
            .iter()
            .map(ValidationIssue::to_string)
            .collect();

        if let Some(id) = doc.value.get("component_id").and_then(|v| v.as_str()) {
            if let Some(first) = seen.get(id) {
                issues.push(format!("duplicate component_id '{}' (also in {})", id, first));
            } else {
                seen.insert(id.to_string(), file.clone());
            }
        }

        results.push(FileResult { file, issues });
    }

    results.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(results)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
