//! Text generation from registry manifests
//!
//! Everything here is template substitution over typed contexts: Prometheus
//! exporter scaffolds for components declaring a metrics namespace, Markdown
//! pages for every component, and Mermaid diagrams of the dependency graph.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod docs;
pub mod errors;
pub mod exporter;
pub mod mermaid;
pub mod template;

pub use docs::{generate_component_doc, generate_index, Documentation, INDEX_FILE};
pub use errors::{CodegenError, TemplateError};
pub use exporter::{ExporterContext, ExporterGenerator, ExporterOutcome, EXPORTER_TEMPLATE};
pub use mermaid::{MermaidGraph, NodeStyle};
pub use template::{render, TemplateContext};
