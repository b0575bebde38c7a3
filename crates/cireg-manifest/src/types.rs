//! Integration manifest types
//!
//! One [`IntegrationManifest`] describes one software component: identity,
//! domain, interfaces and an optional metrics binding. Manifests are stored as
//! YAML, one file per `component_id`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version stamped on freshly generated manifests
pub const DEFAULT_VERSION: &str = "0.1.0";

/// Domain assigned when nothing more specific is known
pub const DEFAULT_DOMAIN: &str = "infrastructure";

/// Port the generated exporter binds when the manifest does not declare one
pub const DEFAULT_METRICS_PORT: u16 = 9100;

/// Placeholder input tag used when none can be inferred
pub const PLACEHOLDER_INPUT: &str = "configuration";

/// Placeholder output tag used when none can be inferred
pub const PLACEHOLDER_OUTPUT: &str = "logs";

// =============================================================================
// MANIFEST
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationManifest {
    pub component_id: String,
    pub domain: String,
    pub owner: String,
    #[serde(default = "default_inputs")]
    pub inputs: Vec<String>,
    #[serde(default = "default_outputs")]
    pub outputs: Vec<String>,
    #[serde(default)]
    pub docs: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_classification: Option<DataClassification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

/// A declared dependency on another component
///
/// The target does not have to exist in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub component_id: String,
    #[serde(default = "any_version")]
    pub version: String,
}

fn default_inputs() -> Vec<String> {
    vec![PLACEHOLDER_INPUT.to_string()]
}

fn default_outputs() -> Vec<String> {
    vec![PLACEHOLDER_OUTPUT.to_string()]
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn any_version() -> String {
    "*".to_string()
}

// =============================================================================
// ENUMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataClassification {
    Public,
    Internal,
    Pii,
    Secret,
}

impl DataClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataClassification::Public => "public",
            DataClassification::Internal => "internal",
            DataClassification::Pii => "pii",
            DataClassification::Secret => "secret",
        }
    }
}

impl fmt::Display for DataClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle stage of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Planning,
    Development,
    Alpha,
    Beta,
    Stable,
    Deprecated,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Planning => "planning",
            Status::Development => "development",
            Status::Alpha => "alpha",
            Status::Beta => "beta",
            Status::Stable => "stable",
            Status::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
