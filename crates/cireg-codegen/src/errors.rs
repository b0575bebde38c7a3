use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while rendering a template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template placeholder '{0}'")]
    UnknownPlaceholder(String),

    #[error("Unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// Errors raised while generating files
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Refusing to write files for component_id '{0}': not a valid component id")]
    InvalidComponentId(String),

    #[error("Metrics namespace '{namespace}' of {component_id} is not a valid metric name prefix")]
    InvalidNamespace {
        component_id: String,
        namespace: String,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CodegenError::Io {
            path: path.into(),
            source,
        }
    }
}
