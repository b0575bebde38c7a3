//! Dependency graph derived from manifests
//!
//! Nodes are component ids, edges point from a dependent to its dependency.
//! Targets without a manifest of their own are kept as dangling nodes. The
//! graph is rebuilt on every invocation and never persisted. Cycles are
//! accepted as declared.

use crate::types::IntegrationManifest;
use ahash::AHashMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// Directed edge to a dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub target: Arc<str>,
    pub version: Arc<str>,
}

#[derive(Debug, Clone)]
struct Node {
    id: Arc<str>,
    has_manifest: bool,
    edges: SmallVec<[Edge; 4]>,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// First-seen order, keeps rendered output stable
    nodes: Vec<Node>,
    index: AHashMap<Arc<str>, usize>,
}

impl DependencyGraph {
    /// Build the graph for a set of manifests
    pub fn build(manifests: &[IntegrationManifest]) -> Self {
        let mut graph = DependencyGraph::default();
        for manifest in manifests {
            let idx = graph.ensure_node(&manifest.component_id);
            graph.nodes[idx].has_manifest = true;

            for dep in &manifest.dependencies {
                let target_idx = graph.ensure_node(&dep.component_id);
                let target = graph.nodes[target_idx].id.clone();
                let node = &mut graph.nodes[idx];
                if !node.edges.iter().any(|e| e.target == target) {
                    node.edges.push(Edge {
                        target,
                        version: Arc::from(dep.version.as_str()),
                    });
                }
            }
        }
        graph
    }

    fn ensure_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let id: Arc<str> = Arc::from(id);
        let idx = self.nodes.len();
        self.nodes.push(Node {
            id: id.clone(),
            has_manifest: false,
            edges: SmallVec::new(),
        });
        self.index.insert(id, idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Whether `id` is only known as a dependency target
    pub fn is_dangling(&self, id: &str) -> bool {
        self.index
            .get(id)
            .is_some_and(|&idx| !self.nodes[idx].has_manifest)
    }

    /// All node ids in first-seen order
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_ref())
    }

    /// Ids referenced as dependencies but lacking a manifest
    pub fn dangling(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| !n.has_manifest)
            .map(|n| n.id.as_ref())
            .collect()
    }

    /// Direct dependencies of `id`, in declaration order
    pub fn dependencies(&self, id: &str) -> &[Edge] {
        match self.index.get(id) {
            Some(&idx) => self.nodes[idx].edges.as_slice(),
            None => &[],
        }
    }

    /// Components whose adjacency list contains `id`
    ///
    /// Computed on demand by scanning every adjacency list.
    pub fn used_by(&self, id: &str) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.edges.iter().any(|e| e.target.as_ref() == id))
            .map(|n| n.id.as_ref())
            .collect()
    }

    /// Every edge as `(dependent, edge)`
    pub fn edges(&self) -> impl Iterator<Item = (&str, &Edge)> {
        self.nodes
            .iter()
            .flat_map(|n| n.edges.iter().map(move |e| (n.id.as_ref(), e)))
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dependency;

    fn manifest(id: &str, deps: &[&str]) -> IntegrationManifest {
        let mut m = IntegrationManifest::minimal(id, "@team");
        m.dependencies = deps
            .iter()
            .map(|d| Dependency {
                component_id: (*d).to_string(),
                version: "0.1.0".to_string(),
            })
            .collect();
        m
    }

    #[test]
    fn test_forward_and_reverse_lookup() {
        let graph = DependencyGraph::build(&[manifest("a", &["b"]), manifest("b", &[])]);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.dependencies("a")[0].target.as_ref(), "b");
        assert_eq!(graph.used_by("b"), vec!["a"]);
        assert!(graph.used_by("a").is_empty());
        assert!(graph.dependencies("missing").is_empty());
    }

    #[test]
    fn test_dangling_dependency_is_kept() {
        let graph = DependencyGraph::build(&[manifest("api-gateway", &["auth-service"])]);

        assert!(graph.contains("auth-service"));
        assert!(graph.is_dangling("auth-service"));
        assert!(!graph.is_dangling("api-gateway"));
        assert_eq!(graph.dangling(), vec!["auth-service"]);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_dependency_target_seen_before_its_manifest() {
        let graph = DependencyGraph::build(&[manifest("a", &["b"]), manifest("b", &["c"])]);

        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(!graph.is_dangling("b"));
        assert!(graph.is_dangling("c"));
    }

    #[test]
    fn test_cycles_are_accepted() {
        let graph = DependencyGraph::build(&[manifest("a", &["b"]), manifest("b", &["a"])]);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.used_by("a"), vec!["b"]);
        assert_eq!(graph.used_by("b"), vec!["a"]);
    }

    #[test]
    fn test_repeated_dependency_collapses_to_one_edge() {
        let graph = DependencyGraph::build(&[manifest("a", &["b", "b"])]);
        assert_eq!(graph.edge_count(), 1);
    }
}
