use crate::rules::{DomainTable, IoRuleTable};
use cireg_config::Config;
use cireg_manifest::{
    is_valid_component_id, slugify, DataClassification, IntegrationManifest, ManifestStore,
    Status, DEFAULT_VERSION,
};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Tags stamped on every inferred skeleton
const SKELETON_TAGS: &[&str] = &["v0.1", "auto-generated"];

/// A directory that has no manifest yet, with the inferred skeleton
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub manifest: IntegrationManifest,
}

#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Directories lacking a manifest, in scan order
    pub candidates: Vec<Candidate>,
    /// Component names skipped because a manifest already exists
    pub existing: Vec<String>,
    /// Directories skipped because their slug is unusable or repeats an
    /// earlier candidate's
    pub conflicts: Vec<Conflict>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub path: PathBuf,
    pub component_id: String,
    /// Directory of the earlier candidate with the same id, if any
    pub first: Option<PathBuf>,
}

/// Finds component directories without manifests and infers skeletons for them
#[derive(Debug)]
pub struct Scanner<'a> {
    root: PathBuf,
    store: &'a ManifestStore,
    domains: DomainTable,
    io_rules: IoRuleTable,
    owner: String,
}

impl<'a> Scanner<'a> {
    pub fn new(root: impl Into<PathBuf>, store: &'a ManifestStore, owner: &str) -> Self {
        Scanner {
            root: root.into(),
            store,
            domains: DomainTable::default(),
            io_rules: IoRuleTable::default(),
            owner: owner.to_string(),
        }
    }

    /// Scanner using the configured owner and domain rules
    pub fn from_config(root: &Path, store: &'a ManifestStore, config: &Config) -> Self {
        Scanner::new(root, store, config.default_owner())
            .with_domains(DomainTable::from_config(&config.domain_rules))
    }

    pub fn with_domains(mut self, domains: DomainTable) -> Self {
        self.domains = domains;
        self
    }

    pub fn with_io_rules(mut self, io_rules: IoRuleTable) -> Self {
        self.io_rules = io_rules;
        self
    }

    /// Scan candidate directories
    ///
    /// Directories that do not exist are skipped silently. Nothing is written;
    /// persisting a skeleton is up to the caller. At most one candidate is
    /// produced per `component_id`: a later directory with the same slug is
    /// reported as a conflict.
    pub fn scan(&self, directories: &[PathBuf]) -> ScanReport {
        let mut report = ScanReport::default();
        let mut seen: HashSet<String> = HashSet::new();

        for dir in directories {
            if !dir.is_dir() {
                debug!("Skipping {}: not a directory", dir.display());
                continue;
            }

            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let component_id = slugify(name);

            if self.store.contains(name) || self.store.contains(&component_id) {
                debug!("Manifest already exists for {}", name);
                report.existing.push(name.to_string());
                continue;
            }

            if !is_valid_component_id(&component_id) {
                warn!("{} does not slug to a valid component id", dir.display());
                report.conflicts.push(Conflict {
                    path: dir.clone(),
                    component_id,
                    first: None,
                });
                continue;
            }

            if !seen.insert(component_id.clone()) {
                let first = report
                    .candidates
                    .iter()
                    .find(|c| c.manifest.component_id == component_id)
                    .map(|c| c.path.clone());
                warn!("{} repeats component id '{}'", dir.display(), component_id);
                report.conflicts.push(Conflict {
                    path: dir.clone(),
                    component_id,
                    first,
                });
                continue;
            }

            report.candidates.push(Candidate {
                path: dir.clone(),
                manifest: self.infer(dir, name),
            });
        }

        info!(
            "Scanned {} directories: {} new, {} already registered, {} conflicting",
            directories.len(),
            report.candidates.len(),
            report.existing.len(),
            report.conflicts.len()
        );
        report
    }

    /// Build the skeleton manifest for one directory
    pub fn infer(&self, dir: &Path, name: &str) -> IntegrationManifest {
        let relative = dir.strip_prefix(&self.root).unwrap_or(dir);
        let segments: Vec<&str> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();
        let domain = self.domains.classify(segments.iter().copied());
        let io = self.io_rules.infer(&list_file_names(dir));

        IntegrationManifest {
            component_id: slugify(name),
            domain: domain.to_string(),
            owner: self.owner.clone(),
            inputs: io.inputs,
            outputs: io.outputs,
            docs: format!("docs/{}.md", name.to_lowercase()),
            tags: SKELETON_TAGS.iter().map(|t| (*t).to_string()).collect(),
            version: DEFAULT_VERSION.to_string(),
            dependencies: Vec::new(),
            metrics_namespace: None,
            metrics_port: None,
            data_classification: Some(DataClassification::Internal),
            status: Some(Status::Development),
        }
    }
}

/// Names of the direct children of `dir`
fn list_file_names(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        match entry {
            Ok(entry) => names.push(entry.file_name().to_string_lossy().to_string()),
            Err(e) => warn!("Failed to read entry in {}: {}", dir.display(), e),
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{IoEffect, IoRule, NameContainsAny};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        root: TempDir,
        store: ManifestStore,
    }

    impl Fixture {
        fn new() -> Option<Self> {
            let root = TempDir::new().ok()?;
            let store = ManifestStore::at(root.path().join("integrations"));
            Some(Fixture { root, store })
        }

        fn component(&self, dir: &str, files: &[&str]) -> Option<PathBuf> {
            let path = self.root.path().join(dir);
            fs::create_dir_all(&path).ok()?;
            for file in files {
                fs::write(path.join(file), "").ok()?;
            }
            Some(path)
        }
    }

    #[test]
    fn test_scan_infers_skeleton() {
        let Some(fx) = Fixture::new() else {
            return;
        };
        let Some(app) = fx.component("app", &["api-server.ts", "worker.ts"]) else {
            return;
        };

        let scanner = Scanner::new(fx.root.path(), &fx.store, "@platform-team");
        let report = scanner.scan(&[app.clone()]);

        assert_eq!(report.candidates.len(), 1);
        let candidate = &report.candidates[0];
        assert_eq!(candidate.path, app);
        let m = &candidate.manifest;
        assert_eq!(m.component_id, "app");
        assert_eq!(m.domain, "backend");
        assert_eq!(m.owner, "@platform-team");
        assert_eq!(m.inputs, vec!["http_requests", "task_queue"]);
        assert_eq!(m.outputs, vec!["api_responses", "processed_data"]);
        assert_eq!(m.docs, "docs/app.md");
        assert_eq!(m.tags, vec!["v0.1", "auto-generated"]);
        assert_eq!(m.data_classification, Some(DataClassification::Internal));
        assert_eq!(m.status, Some(Status::Development));
    }

    #[test]
    fn test_missing_directories_are_skipped() {
        let Some(fx) = Fixture::new() else {
            return;
        };
        let scanner = Scanner::new(fx.root.path(), &fx.store, "@platform-team");
        let report = scanner.scan(&[fx.root.path().join("mobile")]);
        assert!(report.candidates.is_empty());
        assert!(report.existing.is_empty());
    }

    #[test]
    fn test_existing_manifest_is_not_clobbered() {
        let Some(fx) = Fixture::new() else {
            return;
        };
        let Some(launcher) = fx.component("mcp-launcher", &["server.js"]) else {
            return;
        };
        let Some(scripts) = fx.component("scripts", &["lint.js"]) else {
            return;
        };
        let existing = IntegrationManifest::minimal("mcp-launcher", "@mcp-team");
        assert!(fx.store.write(&existing).is_ok());

        let scanner = Scanner::new(fx.root.path(), &fx.store, "@platform-team");
        let report = scanner.scan(&[launcher, scripts]);

        assert_eq!(report.existing, vec!["mcp-launcher"]);
        let ids: Vec<_> = report
            .candidates
            .iter()
            .map(|c| c.manifest.component_id.as_str())
            .collect();
        assert_eq!(ids, vec!["scripts"]);
        assert_eq!(report.candidates[0].manifest.domain, "infrastructure");
        assert_eq!(report.candidates[0].manifest.inputs, vec!["configuration"]);
    }

    #[test]
    fn test_name_is_slugified() {
        let Some(fx) = Fixture::new() else {
            return;
        };
        let Some(dir) = fx.component("Data_Pipeline", &["processor.py"]) else {
            return;
        };
        let scanner = Scanner::new(fx.root.path(), &fx.store, "@data-team");
        let report = scanner.scan(&[dir]);

        let m = &report.candidates[0].manifest;
        assert_eq!(m.component_id, "data-pipeline");
        assert_eq!(m.docs, "docs/data_pipeline.md");
        assert_eq!(m.inputs, vec!["task_queue"]);
    }

    #[test]
    fn test_domain_uses_path_relative_to_root() {
        let Some(fx) = Fixture::new() else {
            return;
        };
        let Some(dir) = fx.component("src/security", &[]) else {
            return;
        };
        let scanner = Scanner::new(fx.root.path(), &fx.store, "@platform-team");
        // "src" is the first segment under the root
        assert_eq!(scanner.infer(&dir, "security").domain, "frontend");
    }

    #[test]
    fn test_same_slug_yields_one_candidate() {
        let Some(fx) = Fixture::new() else {
            return;
        };
        let Some(first) = fx.component("Data_Pipeline", &[]) else {
            return;
        };
        let Some(second) = fx.component("nested/data-pipeline", &[]) else {
            return;
        };
        let scanner = Scanner::new(fx.root.path(), &fx.store, "@data-team");
        let report = scanner.scan(&[first.clone(), second.clone()]);

        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.candidates[0].path, first);
        assert_eq!(
            report.conflicts,
            vec![Conflict {
                path: second,
                component_id: "data-pipeline".to_string(),
                first: Some(first),
            }]
        );
    }

    #[test]
    fn test_unusable_slug_is_a_conflict() {
        let Some(fx) = Fixture::new() else {
            return;
        };
        let Some(dir) = fx.component("_scratch", &[]) else {
            return;
        };
        let scanner = Scanner::new(fx.root.path(), &fx.store, "@x");
        let report = scanner.scan(&[dir]);

        assert!(report.candidates.is_empty());
        assert_eq!(report.conflicts[0].component_id, "-scratch");
        assert_eq!(report.conflicts[0].first, None);
    }

    #[test]
    fn test_custom_io_rules_replace_defaults() {
        let Some(fx) = Fixture::new() else {
            return;
        };
        let Some(dir) = fx.component("ingest", &["kafka-consumer.rs", "worker.ts"]) else {
            return;
        };
        let mut rules = IoRuleTable::empty();
        rules.push(IoRule::new(
            NameContainsAny::new(&["kafka"]),
            IoEffect::new(&["kafka_events"], &["normalized_events"]),
        ));
        let scanner = Scanner::new(fx.root.path(), &fx.store, "@x").with_io_rules(rules);
        let report = scanner.scan(&[dir]);

        let m = &report.candidates[0].manifest;
        assert_eq!(m.inputs, vec!["kafka_events"]);
        assert_eq!(m.outputs, vec!["normalized_events"]);
    }
}
