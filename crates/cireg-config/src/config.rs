use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the project-level configuration
pub const CONFIG_FILE_NAME: &str = "cireg.toml";

/// Environment variable that overrides the configuration file location
pub const CONFIG_ENV: &str = "CIREG_CONFIG";

const DEFAULT_STORE_DIR: &str = "integrations";
const DEFAULT_SCHEMA_FILE: &str = "registry.schema.json";
const DEFAULT_EXPORTERS_DIR: &str = "exporters";
const DEFAULT_DOCS_DIR: &str = "docs/integrations";
const DEFAULT_OWNER: &str = "@platform-team";
const DEFAULT_SCAN_DIRS: &[&str] = &[
    "src",
    "app",
    "scripts",
    "mobile",
    "mcp-launcher",
    "cline-ai-orchestration",
];

/// Error type for configuration loading
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    Io(PathBuf, std::io::Error),
    /// The configuration file is not valid TOML for this schema
    Parse(PathBuf, toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "{}: {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Failed to parse {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(_, e) => Some(e),
        }
    }
}

/// One row of the path-segment to domain lookup table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DomainRule {
    pub segment: String,
    pub domain: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exporters_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_dirs: Option<Vec<String>>,
    /// Replaces the built-in domain table when non-empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domain_rules: Vec<DomainRule>,
}

impl Config {
    /// Path of the configuration file for a project rooted at `root`
    pub fn path(root: &Path) -> PathBuf {
        // Explicit override for CI jobs and tests
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return root.join(trimmed);
            }
        }
        root.join(CONFIG_FILE_NAME)
    }

    /// Load the configuration for `root`, falling back to defaults when no file exists
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::path(root))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "store-dir" => self.store_dir.clone(),
            "schema-path" => self.schema_path.clone(),
            "exporters-dir" => self.exporters_dir.clone(),
            "docs-dir" => self.docs_dir.clone(),
            "default-owner" => self.default_owner.clone(),
            "scan-dirs" => self.scan_dirs.as_ref().map(|dirs| dirs.join(", ")),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.store_dir.is_none()
            && self.schema_path.is_none()
            && self.exporters_dir.is_none()
            && self.docs_dir.is_none()
            && self.default_owner.is_none()
            && self.scan_dirs.is_none()
            && self.domain_rules.is_empty()
    }

    /// Explicitly configured values, in display order
    pub fn values_iter(&self) -> Vec<(&str, String)> {
        let mut values = Vec::new();
        for key in [
            "store-dir",
            "schema-path",
            "exporters-dir",
            "docs-dir",
            "default-owner",
            "scan-dirs",
        ] {
            if let Some(val) = self.get(key) {
                values.push((key, val));
            }
        }
        if !self.domain_rules.is_empty() {
            let rules = self
                .domain_rules
                .iter()
                .map(|r| format!("{}={}", r.segment, r.domain))
                .collect::<Vec<_>>()
                .join(", ");
            values.push(("domain-rules", rules));
        }
        values
    }

    /// Directory holding one manifest file per component
    pub fn store_dir(&self, root: &Path) -> PathBuf {
        root.join(self.store_dir.as_deref().unwrap_or(DEFAULT_STORE_DIR))
    }

    /// Schema document used by `validate`; defaults to a file inside the store
    pub fn schema_path(&self, root: &Path) -> PathBuf {
        match self.schema_path.as_deref() {
            Some(path) => root.join(path),
            None => self.store_dir(root).join(DEFAULT_SCHEMA_FILE),
        }
    }

    pub fn exporters_dir(&self, root: &Path) -> PathBuf {
        root.join(self.exporters_dir.as_deref().unwrap_or(DEFAULT_EXPORTERS_DIR))
    }

    pub fn docs_dir(&self, root: &Path) -> PathBuf {
        root.join(self.docs_dir.as_deref().unwrap_or(DEFAULT_DOCS_DIR))
    }

    pub fn default_owner(&self) -> &str {
        self.default_owner.as_deref().unwrap_or(DEFAULT_OWNER)
    }

    /// Directories the scanner visits, resolved against `root`
    pub fn scan_dirs(&self, root: &Path) -> Vec<PathBuf> {
        match &self.scan_dirs {
            Some(dirs) => dirs.iter().map(|d| root.join(d)).collect(),
            None => DEFAULT_SCAN_DIRS.iter().map(|d| root.join(d)).collect(),
        }
    }
}
