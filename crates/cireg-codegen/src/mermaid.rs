//! Mermaid flowcharts of the dependency graph

use cireg_manifest::DependencyGraph;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStyle {
    Normal,
    /// The component a neighbourhood diagram is drawn around
    Focus,
    /// Referenced as a dependency but has no manifest
    Missing,
}

#[derive(Debug, Clone)]
struct MermaidNode {
    label: String,
    style: NodeStyle,
}

/// A left-to-right flowchart, edges pointing from dependent to dependency
///
/// Node identifiers are positional (`n0`, `n1`, ...) so component ids never
/// collide with Mermaid keywords; the component id is the node label.
#[derive(Debug, Clone, Default)]
pub struct MermaidGraph {
    nodes: Vec<MermaidNode>,
    edges: Vec<(usize, usize)>,
}

impl MermaidGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The whole registry graph
    pub fn full(graph: &DependencyGraph) -> Self {
        let mut chart = MermaidGraph::new();
        for id in graph.node_ids() {
            chart.node(id, style_for(graph, id));
        }
        for (from, edge) in graph.edges() {
            let a = chart.node(from, style_for(graph, from));
            let b = chart.node(&edge.target, style_for(graph, &edge.target));
            chart.edge(a, b);
        }
        chart
    }

    /// `id`, its direct dependencies and its direct dependents
    pub fn neighbourhood(graph: &DependencyGraph, id: &str) -> Self {
        let mut chart = MermaidGraph::new();
        let focus = chart.node(id, NodeStyle::Focus);
        for edge in graph.dependencies(id) {
            let dep = chart.node(&edge.target, style_for(graph, &edge.target));
            chart.edge(focus, dep);
        }
        for user in graph.used_by(id) {
            let from = chart.node(user, style_for(graph, user));
            chart.edge(from, focus);
        }
        chart
    }

    /// Index of the node labelled `label`, adding it if absent
    pub fn node(&mut self, label: &str, style: NodeStyle) -> usize {
        if let Some(idx) = self.nodes.iter().position(|n| n.label == label) {
            return idx;
        }
        self.nodes.push(MermaidNode {
            label: label.to_string(),
            style,
        });
        self.nodes.len() - 1
    }

    pub fn edge(&mut self, from: usize, to: usize) {
        if !self.edges.contains(&(from, to)) {
            self.edges.push((from, to));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mermaid source without Markdown fences
    pub fn source(&self) -> String {
        let mut out = String::from("graph LR\n");
        for (idx, node) in self.nodes.iter().enumerate() {
            let _ = writeln!(out, "    n{}[\"{}\"]", idx, escape_label(&node.label));
        }
        for (from, to) in &self.edges {
            let _ = writeln!(out, "    n{} --> n{}", from, to);
        }

        let styled = |style: NodeStyle| -> Vec<String> {
            self.nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.style == style)
                .map(|(idx, _)| format!("n{}", idx))
                .collect()
        };
        let focus = styled(NodeStyle::Focus);
        if !focus.is_empty() {
            out.push_str("    classDef focus fill:#e3f2fd,stroke:#1565c0,stroke-width:2px\n");
            let _ = writeln!(out, "    class {} focus", focus.join(","));
        }
        let missing = styled(NodeStyle::Missing);
        if !missing.is_empty() {
            out.push_str("    classDef missing fill:#fff3e0,stroke:#e65100,stroke-dasharray:5 5\n");
            let _ = writeln!(out, "    class {} missing", missing.join(","));
        }
        out
    }

    /// Mermaid source wrapped in a fenced code block
    pub fn to_markdown(&self) -> String {
        format!("```mermaid\n{}```\n", self.source())
    }
}

fn style_for(graph: &DependencyGraph, id: &str) -> NodeStyle {
    if graph.is_dangling(id) {
        NodeStyle::Missing
    } else {
        NodeStyle::Normal
    }
}

fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cireg_manifest::{Dependency, IntegrationManifest};

    fn manifest(id: &str, deps: &[&str]) -> IntegrationManifest {
        let mut m = IntegrationManifest::minimal(id, "@team");
        m.dependencies = deps
            .iter()
            .map(|d| Dependency {
                component_id: (*d).to_string(),
                version: "*".to_string(),
            })
            .collect();
        m
    }

    #[test]
    fn test_full_graph_source() {
        let graph = DependencyGraph::build(&[manifest("a", &["b", "c"]), manifest("b", &[])]);
        let source = MermaidGraph::full(&graph).source();

        assert!(source.starts_with("graph LR\n"));
        assert!(source.contains("n0[\"a\"]"));
        assert!(source.contains("n1[\"b\"]"));
        assert!(source.contains("n2[\"c\"]"));
        assert!(source.contains("n0 --> n1"));
        assert!(source.contains("n0 --> n2"));
        assert!(source.contains("class n2 missing"));
        assert!(!source.contains("focus"));
    }

    #[test]
    fn test_neighbourhood_is_one_hop() {
        let graph = DependencyGraph::build(&[
            manifest("a", &["b", "c"]),
            manifest("b", &["d"]),
            manifest("d", &[]),
        ]);
        let source = MermaidGraph::neighbourhood(&graph, "b").source();

        assert!(source.contains("\"b\""));
        assert!(source.contains("\"d\""));
        assert!(source.contains("\"a\""));
        assert!(!source.contains("\"c\""));
        assert!(source.contains("class n0 focus"));
    }

    #[test]
    fn test_markdown_is_fenced() {
        let graph = DependencyGraph::build(&[manifest("end", &[])]);
        let md = MermaidGraph::full(&graph).to_markdown();
        assert!(md.starts_with("```mermaid\ngraph LR\n"));
        assert!(md.ends_with("```\n"));
        assert!(md.contains("n0[\"end\"]"));
    }
}
