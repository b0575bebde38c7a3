//! Centralized error type for the cireg binary
//!
//! Library crates each carry their own error enum; `CliError` wraps them so
//! every command handler can use `?` and `main` maps the result to an exit
//! status in one place.

use cireg_codegen::{CodegenError, TemplateError};
use cireg_config::ConfigError;
use cireg_manifest::ManifestError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Missing component id. Usage: cireg generate <component_id>")]
    MissingComponentId,

    #[error("Invalid component id '{0}': use lowercase letters, digits and hyphens")]
    InvalidComponentId(String),

    #[error("Unknown component '{0}'")]
    UnknownComponent(String),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}
