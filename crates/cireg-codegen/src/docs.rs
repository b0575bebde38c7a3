//! Markdown documentation for the registry
//!
//! One page per component plus an index. Pages are rebuilt from the manifests
//! on every run and overwrite whatever is on disk.

use crate::errors::{CodegenError, TemplateError};
use crate::mermaid::MermaidGraph;
use crate::template::{escape_cell, render, TemplateContext};
use cireg_manifest::{is_valid_component_id, DependencyGraph, IntegrationManifest};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the index page
pub const INDEX_FILE: &str = "README.md";

const NONE: &str = "_None_";

const COMPONENT_TEMPLATE: &str = "# {{component_id}}

> Generated by cireg from the `{{component_id}}` manifest. Manual edits are overwritten by `cireg doc`.

| Field | Value |
|---|---|
| Domain | {{domain}} |
| Owner | {{owner}} |
| Version | {{version}} |
| Status | {{status}} |
| Data Classification | {{classification}} |
| Tags | {{tags}} |
| Docs | {{docs}} |

## Inputs

{{inputs}}

## Outputs

{{outputs}}

## Dependencies

{{dependencies}}

## Used By

{{used_by}}

## Dependency Graph

{{graph}}{{metrics}}";

const INDEX_TEMPLATE: &str = "# Integration Registry

> Generated by cireg. Manual edits are overwritten by `cireg doc`.

{{summary}}

## Components by Domain

{{domains}}
## Dependency Graph

{{graph}}
## Metrics

{{metrics}}{{unresolved}}";

/// Rendered documentation, not yet written to disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Documentation {
    /// Page text keyed by component id
    pub per_component: BTreeMap<String, String>,
    pub index: String,
}

impl Documentation {
    /// Write `<out>/<id>.md` for every component and `<out>/README.md`
    ///
    /// Nothing is written when any page is keyed by an invalid component id.
    pub fn write_to(&self, out_dir: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        if let Some(id) = self.per_component.keys().find(|id| !is_valid_component_id(id)) {
            return Err(CodegenError::InvalidComponentId(id.clone()));
        }
        fs::create_dir_all(out_dir).map_err(|e| CodegenError::io(out_dir, e))?;

        let mut written = Vec::with_capacity(self.per_component.len() + 1);
        for (id, page) in &self.per_component {
            let path = out_dir.join(format!("{}.md", id));
            fs::write(&path, page).map_err(|e| CodegenError::io(&path, e))?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        let index_path = out_dir.join(INDEX_FILE);
        fs::write(&index_path, &self.index).map_err(|e| CodegenError::io(&index_path, e))?;
        written.push(index_path);

        info!("Wrote {} documentation pages to {}", written.len(), out_dir.display());
        Ok(written)
    }
}

struct ComponentPage<'a> {
    manifest: &'a IntegrationManifest,
    dependencies: String,
    used_by: String,
    graph: String,
    metrics: String,
}

impl TemplateContext for ComponentPage<'_> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        let m = self.manifest;
        let value = match key {
            "component_id" => Cow::Borrowed(m.component_id.as_str()),
            "domain" => Cow::Owned(escape_cell(&m.domain)),
            "owner" => Cow::Owned(escape_cell(&m.owner)),
            "version" => Cow::Owned(escape_cell(&m.version)),
            "status" => Cow::Borrowed(m.status.map_or("-", |s| s.as_str())),
            "classification" => Cow::Borrowed(m.data_classification.map_or("-", |c| c.as_str())),
            "tags" => Cow::Owned(if m.tags.is_empty() {
                "-".to_string()
            } else {
                m.tags
                    .iter()
                    .map(|t| format!("`{}`", escape_cell(t)))
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
            "docs" => Cow::Owned(escape_cell(&m.docs)),
            "inputs" => Cow::Owned(bullet_list(&m.inputs)),
            "outputs" => Cow::Owned(bullet_list(&m.outputs)),
            "dependencies" => Cow::Borrowed(self.dependencies.as_str()),
            "used_by" => Cow::Borrowed(self.used_by.as_str()),
            "graph" => Cow::Borrowed(self.graph.as_str()),
            "metrics" => Cow::Borrowed(self.metrics.as_str()),
            _ => return None,
        };
        Some(value)
    }
}

struct IndexPage {
    summary: String,
    domains: String,
    graph: String,
    metrics: String,
    unresolved: String,
}

impl TemplateContext for IndexPage {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        let value = match key {
            "summary" => &self.summary,
            "domains" => &self.domains,
            "graph" => &self.graph,
            "metrics" => &self.metrics,
            "unresolved" => &self.unresolved,
            _ => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }
}

/// Render every component page and the index
pub fn generate(
    manifests: &[IntegrationManifest],
    graph: &DependencyGraph,
) -> Result<Documentation, TemplateError> {
    let mut per_component = BTreeMap::new();
    for manifest in manifests {
        per_component.insert(
            manifest.component_id.clone(),
            generate_component_doc(manifest, graph)?,
        );
    }
    Ok(Documentation {
        per_component,
        index: generate_index(manifests, graph)?,
    })
}

/// Page for one component
pub fn generate_component_doc(
    manifest: &IntegrationManifest,
    graph: &DependencyGraph,
) -> Result<String, TemplateError> {
    let id = manifest.component_id.as_str();

    let mut dependencies = String::new();
    for edge in graph.dependencies(id) {
        if graph.is_dangling(&edge.target) {
            let _ = writeln!(
                dependencies,
                "- {} (`{}`) - no manifest in the registry",
                edge.target, edge.version
            );
        } else {
            let _ = writeln!(
                dependencies,
                "- [{}]({}.md) (`{}`)",
                edge.target, edge.target, edge.version
            );
        }
    }

    let mut used_by = String::new();
    for user in graph.used_by(id) {
        let _ = writeln!(used_by, "- [{}]({}.md)", user, user);
    }

    let metrics = match manifest.effective_namespace() {
        Some(namespace) => {
            let port = manifest.effective_port();
            format!(
                "\n## Metrics\n\n\
                 | Field | Value |\n\
                 |---|---|\n\
                 | Namespace | `{ns}` |\n\
                 | Port | {port} |\n\
                 | Metrics Endpoint | `http://localhost:{port}/metrics` |\n\
                 | Health Check | `http://localhost:{port}/health` |\n\
                 | Exporter | `{id}-exporter.js` |\n",
                ns = namespace,
                port = port,
                id = id,
            )
        }
        None => String::new(),
    };

    let page = ComponentPage {
        manifest,
        dependencies: or_none(dependencies),
        used_by: or_none(used_by),
        graph: MermaidGraph::neighbourhood(graph, id).to_markdown(),
        metrics,
    };
    render(COMPONENT_TEMPLATE, &page)
}

/// Index page: components grouped by domain, the full graph and a metrics table
pub fn generate_index(
    manifests: &[IntegrationManifest],
    graph: &DependencyGraph,
) -> Result<String, TemplateError> {
    let mut by_domain: BTreeMap<&str, Vec<&IntegrationManifest>> = BTreeMap::new();
    for manifest in manifests {
        by_domain.entry(manifest.domain.as_str()).or_default().push(manifest);
    }

    let summary = format!(
        "{} components across {} domains, {} dependency edges.",
        manifests.len(),
        by_domain.len(),
        graph.edge_count()
    );

    let mut domains = String::new();
    if by_domain.is_empty() {
        domains.push_str(NONE);
        domains.push('\n');
    }
    for (domain, members) in &by_domain {
        let _ = write!(
            domains,
            "### {}\n\n| Component | Owner | Status | Version |\n|---|---|---|---|\n",
            domain
        );
        for m in members {
            let _ = writeln!(
                domains,
                "| [{id}]({id}.md) | {} | {} | {} |",
                escape_cell(&m.owner),
                m.status.map_or("-", |s| s.as_str()),
                escape_cell(&m.version),
                id = m.component_id,
            );
        }
        domains.push('\n');
    }

    let mut metrics = String::new();
    for m in manifests {
        let Some(namespace) = m.effective_namespace() else {
            continue;
        };
        if metrics.is_empty() {
            metrics.push_str("| Component | Namespace | Port | Endpoint |\n|---|---|---|---|\n");
        }
        let port = m.effective_port();
        let _ = writeln!(
            metrics,
            "| [{id}]({id}.md) | `{}` | {} | `http://localhost:{}/metrics` |",
            namespace,
            port,
            port,
            id = m.component_id,
        );
    }
    if metrics.is_empty() {
        metrics = "_No components declare a metrics namespace._\n".to_string();
    }

    let dangling = graph.dangling();
    let unresolved = if dangling.is_empty() {
        String::new()
    } else {
        let mut section = String::from(
            "\n## Unresolved Dependencies\n\nReferenced as dependencies but missing a manifest:\n\n",
        );
        for id in dangling {
            let _ = writeln!(section, "- {}", id);
        }
        section
    };

    let page = IndexPage {
        summary,
        domains,
        graph: MermaidGraph::full(graph).to_markdown(),
        metrics,
        unresolved,
    };
    render(INDEX_TEMPLATE, &page)
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return NONE.to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn or_none(list: String) -> String {
    if list.is_empty() {
        NONE.to_string()
    } else {
        list.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cireg_manifest::Dependency;
    use tempfile::TempDir;

    fn manifest(id: &str, domain: &str, deps: &[&str]) -> IntegrationManifest {
        let mut m = IntegrationManifest::minimal(id, "@team");
        m.domain = domain.to_string();
        m.dependencies = deps
            .iter()
            .map(|d| Dependency {
                component_id: (*d).to_string(),
                version: "^1.0".to_string(),
            })
            .collect();
        m
    }

    #[test]
    fn test_used_by_lists_dependents_only() {
        let manifests = vec![manifest("a", "backend", &["b"]), manifest("b", "data", &[])];
        let graph = DependencyGraph::build(&manifests);
        let Ok(docs) = generate(&manifests, &graph) else {
            panic!("docs should render");
        };

        let Some(b_page) = docs.per_component.get("b") else {
            panic!("page for b");
        };
        let used_by = b_page
            .split("## Used By")
            .nth(1)
            .and_then(|s| s.split("##").next())
            .unwrap_or_default();
        assert!(used_by.contains("[a](a.md)"));
        assert!(!b_page.contains("\"c\""));
        assert!(!b_page.contains("[c]"));

        let Some(a_page) = docs.per_component.get("a") else {
            panic!("page for a");
        };
        assert!(a_page.contains("- [b](b.md) (`^1.0`)"));
    }

    #[test]
    fn test_dangling_dependency_is_flagged() {
        let manifests = vec![manifest("a", "backend", &["c"])];
        let graph = DependencyGraph::build(&manifests);
        let Ok(page) = generate_component_doc(&manifests[0], &graph) else {
            panic!("page should render");
        };
        assert!(page.contains("- c (`^1.0`) - no manifest in the registry"));
        assert!(page.contains("class n1 missing"));

        let Ok(index) = generate_index(&manifests, &graph) else {
            panic!("index should render");
        };
        assert!(index.contains("## Unresolved Dependencies"));
        assert!(index.contains("- c\n"));
    }

    #[test]
    fn test_inputs_and_outputs_are_verbatim() {
        let mut m = manifest("queue", "backend", &[]);
        m.inputs = vec!["http_requests".to_string(), "odd | input *tag*".to_string()];
        m.outputs = vec!["processed_data".to_string()];
        let graph = DependencyGraph::build(std::slice::from_ref(&m));
        let Ok(page) = generate_component_doc(&m, &graph) else {
            panic!("page should render");
        };
        for tag in m.inputs.iter().chain(&m.outputs) {
            assert!(page.contains(tag.as_str()), "missing {}", tag);
        }
        assert!(page.contains("_None_"));
        assert!(!page.contains("## Metrics"));
    }

    #[test]
    fn test_metrics_section_and_index_table() {
        let mut kv = manifest("kv-cache", "storage", &[]);
        kv.metrics_namespace = Some("kv_cache".to_string());
        kv.metrics_port = Some(9101);
        let plain = manifest("plain", "storage", &[]);
        let manifests = vec![kv, plain];
        let graph = DependencyGraph::build(&manifests);

        let Ok(docs) = generate(&manifests, &graph) else {
            panic!("docs should render");
        };
        let Some(kv_page) = docs.per_component.get("kv-cache") else {
            panic!("page for kv-cache");
        };
        assert!(kv_page.contains("## Metrics"));
        assert!(kv_page.contains("http://localhost:9101/metrics"));
        assert!(kv_page.contains("http://localhost:9101/health"));

        assert!(docs.index.contains("### storage"));
        assert!(docs.index.contains("| [kv-cache](kv-cache.md) | `kv_cache` | 9101 |"));
        assert!(!docs.index.contains("| [plain](plain.md) | `"));
        assert!(docs.index.contains("2 components across 1 domains"));
    }

    #[test]
    fn test_index_groups_domains_in_sorted_order() {
        let manifests = vec![
            manifest("z-api", "backend", &[]),
            manifest("ingest", "data", &[]),
            manifest("a-api", "backend", &[]),
        ];
        let graph = DependencyGraph::build(&manifests);
        let Ok(index) = generate_index(&manifests, &graph) else {
            panic!("index should render");
        };

        let backend = index.find("### backend");
        let data = index.find("### data");
        assert!(backend < data);
        let z = index.find("[z-api]");
        let a = index.find("[a-api]");
        assert!(z < a, "components keep store order within a domain");
        assert!(index.contains("_No components declare a metrics namespace._"));
        assert!(!index.contains("Unresolved"));
    }

    #[test]
    fn test_write_to_overwrites() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let out = temp_dir.path().join("docs");
        let manifests = vec![manifest("a", "backend", &[])];
        let graph = DependencyGraph::build(&manifests);
        let Ok(docs) = generate(&manifests, &graph) else {
            panic!("docs should render");
        };

        assert!(fs::create_dir_all(&out).is_ok());
        assert!(fs::write(out.join("a.md"), "stale").is_ok());
        let Ok(written) = docs.write_to(&out) else {
            panic!("docs should write");
        };
        assert_eq!(written, vec![out.join("a.md"), out.join(INDEX_FILE)]);
        assert_eq!(
            fs::read_to_string(out.join("a.md")).ok().as_ref(),
            docs.per_component.get("a")
        );
    }

    #[test]
    fn test_write_to_refuses_path_like_ids() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let out = temp_dir.path().join("site").join("docs");
        let manifests = vec![manifest("a", "backend", &[]), manifest("../escaped", "data", &[])];
        let graph = DependencyGraph::build(&manifests);
        let Ok(docs) = generate(&manifests, &graph) else {
            panic!("docs should render");
        };

        assert!(matches!(
            docs.write_to(&out),
            Err(CodegenError::InvalidComponentId(id)) if id == "../escaped"
        ));
        assert!(!out.exists());
        assert!(!temp_dir.path().join("site").join("escaped.md").exists());
    }
}
