//! Project context: root directory, configuration and manifest loading

use crate::errors::CliError;
use crate::GlobalOpts;
use cireg_config::Config;
use cireg_logger as logger;
use cireg_manifest::{IntegrationManifest, LoadReport, ManifestError, ManifestStore, Schema};
use std::path::{Path, PathBuf};

/// A project rooted at one directory, with its resolved configuration
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    pub fn load(opts: &GlobalOpts) -> Result<Self, CliError> {
        let root = opts.project_root();
        let config = Config::load(&root)?;
        logger::debug(&format!(
            "Project root {}, config {}",
            root.display(),
            Config::path(&root).display()
        ));
        Ok(Project { root, config })
    }

    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Project {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store_dir(&self) -> PathBuf {
        self.config.store_dir(&self.root)
    }

    /// Open the manifest store; a missing directory is fatal
    pub fn open_store(&self) -> Result<ManifestStore, CliError> {
        Ok(ManifestStore::open(self.store_dir())?)
    }

    /// Store handle for commands that may create the directory
    pub fn store_for_writing(&self) -> ManifestStore {
        ManifestStore::at(self.store_dir())
    }

    /// Schema document at the configured path; a missing file is fatal
    pub fn load_schema(&self) -> Result<Schema, CliError> {
        let path = self.config.schema_path(&self.root);
        logger::debug(&format!("Using schema {}", self.display_path(&path)));
        Schema::load(&path).map_err(|e| {
            if matches!(e, ManifestError::SchemaNotFound(_)) {
                logger::info("Run `cireg init` to write the default schema");
            }
            e.into()
        })
    }

    /// Manifests that pass the schema, reporting files that were left out
    ///
    /// Generators only ever see manifests that `cireg validate` would accept.
    pub fn load_manifests(&self) -> Result<Vec<IntegrationManifest>, CliError> {
        let store = self.open_store()?;
        let schema = self.load_schema()?;
        let report = store.load_validated(&schema)?;
        report_failures(&report);
        Ok(report.manifests())
    }

    /// Path relative to the project root, for display
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

/// Print one line per skipped manifest file
pub fn report_failures<T>(report: &LoadReport<T>) {
    for failure in &report.failures {
        logger::failure(&format!("{}: {}", failure.file_name(), failure.error));
    }
    if report.has_failures() {
        logger::warn(&format!(
            "{} manifest file(s) skipped; run `cireg validate` for details",
            report.failures.len()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cireg_manifest::DEFAULT_SCHEMA;
    use std::fs;
    use tempfile::TempDir;

    fn project_with_schema(temp_dir: &TempDir) -> Option<Project> {
        let project = Project::new(temp_dir.path(), Config::default());
        fs::create_dir_all(project.store_dir()).ok()?;
        fs::write(
            project.config().schema_path(project.root()),
            DEFAULT_SCHEMA,
        )
        .ok()?;
        Some(project)
    }

    #[test]
    fn test_missing_store_is_fatal() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let project = Project::new(temp_dir.path(), Config::default());
        let result = project.load_manifests();
        assert!(matches!(result, Err(CliError::Manifest(_))));
    }

    #[test]
    fn test_load_manifests_skips_broken_files() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let Some(project) = project_with_schema(&temp_dir) else {
            return;
        };
        let store = project.store_for_writing();
        assert!(store
            .write(&IntegrationManifest::minimal("kv-cache", "@storage"))
            .is_ok());
        assert!(fs::write(project.store_dir().join("broken.yaml"), "owner: [").is_ok());

        let Ok(manifests) = project.load_manifests() else {
            panic!("manifests should load");
        };
        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0].component_id, "kv-cache");
    }

    #[test]
    fn test_load_manifests_excludes_schema_failures() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let Some(project) = project_with_schema(&temp_dir) else {
            return;
        };
        let escaped = "component_id: ../escaped\ndomain: data\nowner: '@x'\n\
                       inputs: [a]\noutputs: [b]\ndocs: docs/x.md\nmetrics_namespace: bad-ns\n";
        let thin = "component_id: thin\ndomain: data\nowner: '@x'\n";
        assert!(fs::write(project.store_dir().join("escaped.yaml"), escaped).is_ok());
        assert!(fs::write(project.store_dir().join("thin.yaml"), thin).is_ok());
        assert!(project
            .store_for_writing()
            .write(&IntegrationManifest::minimal("kv-cache", "@storage"))
            .is_ok());

        let Ok(manifests) = project.load_manifests() else {
            panic!("manifests should load");
        };
        let ids: Vec<_> = manifests.iter().map(|m| m.component_id.as_str()).collect();
        assert_eq!(ids, vec!["kv-cache"]);
    }

    #[test]
    fn test_missing_schema_is_fatal_for_generators() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let project = Project::new(temp_dir.path(), Config::default());
        assert!(fs::create_dir_all(project.store_dir()).is_ok());
        let result = project.load_manifests();
        assert!(matches!(
            result,
            Err(CliError::Manifest(ManifestError::SchemaNotFound(_)))
        ));
    }

    #[test]
    fn test_display_path_is_relative() {
        let project = Project::new("/work", Config::default());
        assert_eq!(
            project.display_path(Path::new("/work/integrations/a.yaml")),
            "integrations/a.yaml"
        );
        assert_eq!(project.display_path(Path::new("/elsewhere")), "/elsewhere");
    }
}
