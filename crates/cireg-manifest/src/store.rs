//! Manifest store - one YAML document per component in a single directory
//!
//! Reading is tolerant: a file that fails to parse is reported alongside the
//! documents that did load, so callers can keep processing the batch. A
//! missing store directory is the only fatal condition.

use crate::errors::ManifestError;
use crate::manifest::is_valid_component_id;
use crate::schema::Schema;
use crate::types::IntegrationManifest;
use ahash::AHashMap;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Handle on the manifest directory
#[derive(Debug, Clone)]
pub struct ManifestStore {
    root: PathBuf,
}

/// Raw manifest document, as parsed from disk but not yet typed
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    pub path: PathBuf,
    pub value: Value,
}

#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub path: PathBuf,
    pub manifest: IntegrationManifest,
}

/// A file excluded from the batch, with the reason
#[derive(Debug)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: ManifestError,
}

impl LoadFailure {
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

/// Result of reading the whole store
#[derive(Debug)]
pub struct LoadReport<T> {
    pub loaded: Vec<T>,
    pub failures: Vec<LoadFailure>,
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        LoadReport {
            loaded: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> LoadReport<T> {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl LoadReport<LoadedManifest> {
    /// The successfully decoded manifests, in store order
    pub fn manifests(&self) -> Vec<IntegrationManifest> {
        self.loaded.iter().map(|l| l.manifest.clone()).collect()
    }
}

impl ManifestStore {
    /// Open an existing store directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ManifestError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ManifestError::StoreNotFound(root));
        }
        Ok(ManifestStore { root })
    }

    /// Handle on a store directory that may not exist yet
    ///
    /// Lookups on a missing directory find nothing; the directory is created
    /// on the first write.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        ManifestStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical location of the manifest for `component_id`
    pub fn manifest_path(&self, component_id: &str) -> PathBuf {
        self.root.join(format!("{}.yaml", component_id))
    }

    /// Whether a manifest file exists for `component_id` under either extension
    pub fn contains(&self, component_id: &str) -> bool {
        MANIFEST_EXTENSIONS
            .iter()
            .any(|ext| self.root.join(format!("{}.{}", component_id, ext)).is_file())
    }

    /// Manifest files in the store, sorted by file name
    pub fn manifest_files(&self) -> Result<Vec<PathBuf>, ManifestError> {
        let entries = fs::read_dir(&self.root).map_err(|e| ManifestError::io(&self.root, e))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_manifest_file(p))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Parse every manifest file into a raw document
    pub fn load_documents(&self) -> Result<LoadReport<ManifestDocument>, ManifestError> {
        let mut report = LoadReport::default();
        for path in self.manifest_files()? {
            match read_document(&path) {
                Ok(value) => report.loaded.push(ManifestDocument { path, value }),
                Err(error) if error.is_per_file() => {
                    debug!("Skipping {}: {}", path.display(), error);
                    report.failures.push(LoadFailure { path, error });
                }
                Err(error) => return Err(error),
            }
        }
        debug!(
            "Loaded {} manifest documents ({} failures) from {}",
            report.loaded.len(),
            report.failures.len(),
            self.root.display()
        );
        Ok(report)
    }

    /// Parse and decode every manifest file
    ///
    /// Files that fail to decode, that declare a malformed `component_id`, or
    /// that repeat an already-seen `component_id` are reported as failures and
    /// left out.
    pub fn load_all(&self) -> Result<LoadReport<LoadedManifest>, ManifestError> {
        Ok(decode_documents(self.load_documents()?, None))
    }

    /// Like [`load_all`](Self::load_all), but each document must first pass `schema`
    ///
    /// The check runs on the raw document, before decoding fills in defaults
    /// for missing fields.
    pub fn load_validated(
        &self,
        schema: &Schema,
    ) -> Result<LoadReport<LoadedManifest>, ManifestError> {
        Ok(decode_documents(self.load_documents()?, Some(schema)))
    }

    /// Write a manifest, replacing any existing file for its id
    ///
    /// The whole file is rewritten through a temporary file and a rename.
    pub fn write(&self, manifest: &IntegrationManifest) -> Result<PathBuf, ManifestError> {
        if !is_valid_component_id(&manifest.component_id) {
            return Err(ManifestError::InvalidComponentId(
                manifest.component_id.clone(),
            ));
        }
        let path = self.manifest_path(&manifest.component_id);
        let content = serde_yaml::to_string(manifest)?;
        fs::create_dir_all(&self.root).map_err(|e| ManifestError::io(&self.root, e))?;

        let temp_path = path.with_extension("yaml.tmp");
        {
            let file = fs::File::create(&temp_path).map_err(|e| ManifestError::io(&temp_path, e))?;
            let mut writer = std::io::BufWriter::new(file);
            writer
                .write_all(content.as_bytes())
                .and_then(|()| writer.flush())
                .map_err(|e| ManifestError::io(&temp_path, e))?;
        }
        fs::rename(&temp_path, &path).map_err(|e| ManifestError::io(&path, e))?;

        debug!("Wrote manifest {}", path.display());
        Ok(path)
    }
}

fn decode_documents(
    documents: LoadReport<ManifestDocument>,
    schema: Option<&Schema>,
) -> LoadReport<LoadedManifest> {
    let mut report = LoadReport {
        loaded: Vec::with_capacity(documents.loaded.len()),
        failures: documents.failures,
    };
    let mut seen: AHashMap<String, PathBuf> = AHashMap::new();

    for doc in documents.loaded {
        if let Some(schema) = schema {
            let validation = schema.validate(&doc.value);
            if !validation.is_valid() {
                let issues = validation.errors;
                skip(&mut report, doc.path, ManifestError::SchemaViolation { issues });
                continue;
            }
        }

        let manifest = match serde_json::from_value::<IntegrationManifest>(doc.value) {
            Ok(m) => m,
            Err(source) => {
                let path = doc.path.clone();
                skip(&mut report, doc.path, ManifestError::Decode { path, source });
                continue;
            }
        };

        if !is_valid_component_id(&manifest.component_id) {
            let error = ManifestError::InvalidComponentId(manifest.component_id);
            skip(&mut report, doc.path, error);
            continue;
        }

        if let Some(first) = seen.get(&manifest.component_id) {
            let error = ManifestError::Duplicate {
                component_id: manifest.component_id,
                first: first.clone(),
            };
            skip(&mut report, doc.path, error);
            continue;
        }

        let stem = doc.path.file_stem().and_then(|s| s.to_str());
        if stem != Some(manifest.component_id.as_str()) {
            warn!(
                "{} declares component_id '{}' which does not match its file name",
                doc.path.display(),
                manifest.component_id
            );
        }

        seen.insert(manifest.component_id.clone(), doc.path.clone());
        report.loaded.push(LoadedManifest {
            path: doc.path,
            manifest,
        });
    }
    report
}

fn skip<T>(report: &mut LoadReport<T>, path: PathBuf, error: ManifestError) {
    debug!("Skipping {}: {}", path.display(), error);
    report.failures.push(LoadFailure { path, error });
}

fn is_manifest_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
}

fn read_document(path: &Path) -> Result<Value, ManifestError> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
    serde_yaml::from_str::<Value>(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
