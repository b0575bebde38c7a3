//! Manifest operations - construction, naming and metrics defaults

use crate::types::{
    IntegrationManifest, Status, DEFAULT_DOMAIN, DEFAULT_METRICS_PORT, DEFAULT_VERSION,
    PLACEHOLDER_INPUT, PLACEHOLDER_OUTPUT,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// Shape of a `component_id`, shared with the registry schema
pub const COMPONENT_ID_PATTERN: &str = "^[a-z0-9][a-z0-9-]*$";

static COMPONENT_ID: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(COMPONENT_ID_PATTERN));

/// Turn an arbitrary directory or component name into a `component_id` slug
///
/// Lowercases the name and replaces every character outside `[a-z0-9-]` with `-`.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Whether `id` is a well-formed component slug
pub fn is_valid_component_id(id: &str) -> bool {
    COMPONENT_ID.as_ref().is_ok_and(|re| re.is_match(id))
}

/// Whether `namespace` is usable as a Prometheus metric name prefix
pub fn is_valid_metrics_namespace(namespace: &str) -> bool {
    let mut chars = namespace.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl IntegrationManifest {
    /// Minimal manifest for a brand-new component id
    pub fn minimal(component_id: &str, owner: &str) -> Self {
        IntegrationManifest {
            component_id: component_id.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            owner: owner.to_string(),
            inputs: vec![PLACEHOLDER_INPUT.to_string()],
            outputs: vec![PLACEHOLDER_OUTPUT.to_string()],
            docs: format!("docs/{}.md", component_id),
            tags: Vec::new(),
            version: DEFAULT_VERSION.to_string(),
            dependencies: Vec::new(),
            metrics_namespace: None,
            metrics_port: None,
            data_classification: None,
            status: Some(Status::Development),
        }
    }

    /// Whether this component asks for a generated metrics exporter
    pub fn declares_metrics(&self) -> bool {
        self.metrics_namespace.is_some()
    }

    /// Metric name prefix, if the component declares one
    ///
    /// A blank namespace falls back to the component id with hyphens
    /// replaced by underscores.
    pub fn effective_namespace(&self) -> Option<String> {
        self.metrics_namespace.as_deref().map(|ns| {
            let ns = ns.trim();
            if ns.is_empty() {
                self.component_id.replace('-', "_")
            } else {
                ns.to_string()
            }
        })
    }

    pub fn effective_port(&self) -> u16 {
        self.metrics_port.unwrap_or(DEFAULT_METRICS_PORT)
    }

    pub fn dependency_ids(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|d| d.component_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dependency;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("mcp-launcher"), "mcp-launcher");
        assert_eq!(slugify("Cline_AI Orchestration"), "cline-ai-orchestration");
        assert_eq!(slugify("KV.Cache2"), "kv-cache2");
    }

    #[test]
    fn test_component_id_validation() {
        assert!(is_valid_component_id("kv-cache"));
        assert!(is_valid_component_id("a1"));
        assert!(!is_valid_component_id("KV-cache"));
        assert!(!is_valid_component_id("-leading"));
        assert!(!is_valid_component_id(""));
        assert!(!is_valid_component_id("../escaped"));
        assert!(!is_valid_component_id("a/b"));
    }

    #[test]
    fn test_metrics_namespace_validation() {
        assert!(is_valid_metrics_namespace("kv_cache"));
        assert!(is_valid_metrics_namespace("_private2"));
        assert!(!is_valid_metrics_namespace("bad-ns"));
        assert!(!is_valid_metrics_namespace("9lives"));
        assert!(!is_valid_metrics_namespace(""));
    }

    #[test]
    fn test_component_id_pattern_compiles_and_matches_schema() {
        assert!(COMPONENT_ID.is_ok());
        let needle = format!("\"pattern\": \"{}\"", COMPONENT_ID_PATTERN);
        assert!(crate::schema::DEFAULT_SCHEMA.contains(&needle));
    }

    #[test]
    fn test_minimal_manifest_defaults() {
        let manifest = IntegrationManifest::minimal("my-new-component", "@platform-team");
        assert_eq!(manifest.domain, "infrastructure");
        assert_eq!(manifest.inputs, vec!["configuration"]);
        assert_eq!(manifest.outputs, vec!["logs"]);
        assert_eq!(manifest.docs, "docs/my-new-component.md");
        assert_eq!(manifest.version, "0.1.0");
        assert_eq!(manifest.status, Some(Status::Development));
        assert!(!manifest.declares_metrics());
    }

    #[test]
    fn test_effective_namespace_and_port() {
        let mut manifest = IntegrationManifest::minimal("kv-cache", "@storage");
        assert_eq!(manifest.effective_namespace(), None);
        assert_eq!(manifest.effective_port(), 9100);

        manifest.metrics_namespace = Some("  ".to_string());
        assert_eq!(manifest.effective_namespace().as_deref(), Some("kv_cache"));

        manifest.metrics_namespace = Some("cache".to_string());
        manifest.metrics_port = Some(9101);
        assert_eq!(manifest.effective_namespace().as_deref(), Some("cache"));
        assert_eq!(manifest.effective_port(), 9101);
    }

    #[test]
    fn test_yaml_defaults_fill_missing_fields() {
        let yaml = "component_id: kv-cache\ndomain: storage\nowner: '@storage'\n\
                    dependencies:\n  - component_id: blob-store\n";
        let Ok(manifest) = serde_yaml::from_str::<IntegrationManifest>(yaml) else {
            panic!("manifest should decode");
        };
        assert_eq!(manifest.inputs, vec!["configuration"]);
        assert_eq!(manifest.outputs, vec!["logs"]);
        assert_eq!(manifest.version, "0.1.0");
        assert_eq!(
            manifest.dependencies,
            vec![Dependency {
                component_id: "blob-store".to_string(),
                version: "*".to_string(),
            }]
        );
        assert_eq!(manifest.dependency_ids().collect::<Vec<_>>(), vec!["blob-store"]);
    }
}
