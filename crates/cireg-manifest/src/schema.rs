//! Schema validation for manifest documents
//!
//! The schema document is compiled with `jsonschema`; its draft comes from
//! the document's `$schema` keyword and `format` assertions are enabled.
//!
//! Validation collects every error instead of stopping at the first one.
//! Each error carries the JSON pointer of the offending value. A missing
//! required property and an unexpected property are reported at the pointer
//! the property has (or would have), one error per property.

use crate::errors::ManifestError;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{ValidationError, Validator};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// The registry's manifest schema, written by `cireg init`
pub const DEFAULT_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Integration Manifest",
  "type": "object",
  "required": ["component_id", "domain", "owner", "inputs", "outputs", "docs"],
  "additionalProperties": false,
  "properties": {
    "component_id": { "type": "string", "pattern": "^[a-z0-9][a-z0-9-]*$" },
    "domain": { "type": "string" },
    "owner": { "type": "string" },
    "inputs": { "type": "array", "minItems": 1, "items": { "type": "string" } },
    "outputs": { "type": "array", "minItems": 1, "items": { "type": "string" } },
    "docs": { "type": "string" },
    "tags": { "type": "array", "items": { "type": "string" } },
    "version": { "type": "string", "pattern": "^\\d+\\.\\d+\\.\\d+(-[0-9A-Za-z.-]+)?$" },
    "dependencies": {
      "type": "array",
      "items": {
        "type": "object",
        "required": ["component_id", "version"],
        "additionalProperties": false,
        "properties": {
          "component_id": { "type": "string", "pattern": "^[a-z0-9][a-z0-9-]*$" },
          "version": { "type": "string" }
        }
      }
    },
    "metrics_namespace": { "type": "string", "pattern": "^[a-zA-Z_][a-zA-Z0-9_]*$" },
    "metrics_port": { "type": "integer", "minimum": 1, "maximum": 65535 },
    "data_classification": { "type": "string", "enum": ["public", "internal", "pii", "secret"] },
    "status": {
      "type": "string",
      "enum": ["planning", "development", "alpha", "beta", "stable", "deprecated"]
    }
  }
}
"#;

/// A single structural violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// JSON pointer to the offending value, `""` for the document root
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

/// Outcome of validating one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A compiled schema document
#[derive(Clone)]
pub struct Schema {
    root: Value,
    validator: Arc<Validator>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Schema {
    /// Load a schema document from disk
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::SchemaNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
        let root: Value =
            serde_json::from_str(&content).map_err(|source| ManifestError::SchemaParse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_value(root)
    }

    /// The built-in registry schema
    pub fn registry_default() -> Result<Self, ManifestError> {
        let root: Value = serde_json::from_str(DEFAULT_SCHEMA)
            .map_err(|e| ManifestError::InvalidSchema(e.to_string()))?;
        Self::from_value(root)
    }

    pub fn from_value(root: Value) -> Result<Self, ManifestError> {
        if !root.is_object() {
            return Err(ManifestError::InvalidSchema(
                "schema root must be an object".to_string(),
            ));
        }
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(&root)
            .map_err(|e| ManifestError::InvalidSchema(e.to_string()))?;
        Ok(Schema {
            root,
            validator: Arc::new(validator),
        })
    }

    /// Validate a document against this schema
    pub fn validate(&self, instance: &Value) -> ValidationReport {
        let mut errors = Vec::new();
        for error in self.validator.iter_errors(instance) {
            push_issues(&error, &mut errors);
        }
        ValidationReport { errors }
    }
}

fn push_issues(error: &ValidationError<'_>, out: &mut Vec<ValidationIssue>) {
    let path = error.instance_path().to_string();
    match error.kind() {
        ValidationErrorKind::Required { property } => {
            let key = property
                .as_str()
                .map_or_else(|| property.to_string(), str::to_string);
            out.push(issue(&child_path(&path, &key), "missing required property"));
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            for key in unexpected {
                out.push(issue(&child_path(&path, key), "unknown property"));
            }
        }
        _ => out.push(issue(&path, &error.to_string())),
    }
}

fn child_path(parent: &str, key: &str) -> String {
    format!("{}/{}", parent, key.replace('~', "~0").replace('/', "~1"))
}

fn issue(path: &str, message: &str) -> ValidationIssue {
    ValidationIssue {
        path: path.to_string(),
        message: message.to_string(),
    }
}
