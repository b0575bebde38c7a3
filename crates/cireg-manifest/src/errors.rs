use crate::schema::ValidationIssue;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, writing or validating manifests
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Manifest store not found: {}", .0.display())]
    StoreNotFound(PathBuf),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parse error: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid manifest: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("Duplicate component_id '{component_id}' (already declared in {})", .first.display())]
    Duplicate {
        component_id: String,
        first: PathBuf,
    },

    #[error("Fails schema validation: {}", join_issues(.issues))]
    SchemaViolation { issues: Vec<ValidationIssue> },

    #[error("Invalid component_id '{0}': use lowercase letters, digits and hyphens")]
    InvalidComponentId(String),

    #[error("Schema document not found: {}", .0.display())]
    SchemaNotFound(PathBuf),

    #[error("Failed to parse schema document {}: {source}", .path.display())]
    SchemaParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

impl ManifestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ManifestError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error only affects a single manifest file
    ///
    /// Per-file errors are reported and the batch continues; anything else
    /// aborts the command.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            ManifestError::Parse { .. }
                | ManifestError::Decode { .. }
                | ManifestError::Duplicate { .. }
                | ManifestError::SchemaViolation { .. }
                | ManifestError::InvalidComponentId(_)
        )
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
