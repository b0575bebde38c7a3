//! Integration manifest registry
//!
//! Core types and operations for the component registry: the manifest data
//! model, the on-disk manifest store, JSON Schema validation and the
//! dependency graph derived from declared dependencies.
//!
//! Manifests are stored as YAML, one file per component, in a single store
//! directory.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod errors;
pub mod graph;
pub mod manifest;
pub mod schema;
pub mod store;
pub mod types;

pub use errors::ManifestError;
pub use graph::{DependencyGraph, Edge};
pub use manifest::{is_valid_component_id, is_valid_metrics_namespace, slugify};
pub use schema::{Schema, ValidationIssue, ValidationReport, DEFAULT_SCHEMA};
pub use store::{LoadFailure, LoadReport, LoadedManifest, ManifestDocument, ManifestStore};
pub use types::{
    DataClassification, Dependency, IntegrationManifest, Status, DEFAULT_DOMAIN,
    DEFAULT_METRICS_PORT, DEFAULT_VERSION, PLACEHOLDER_INPUT, PLACEHOLDER_OUTPUT,
};
