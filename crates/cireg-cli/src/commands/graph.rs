use crate::common::Outcome;
use crate::errors::CliError;
use crate::project::Project;
use cireg_codegen::MermaidGraph;
use cireg_logger as logger;
use cireg_manifest::DependencyGraph;

/// Print the dependency graph as Mermaid source
///
/// With a component id only its one-hop neighbourhood is printed.
pub fn handle_graph(component_id: Option<String>, project: &Project) -> Result<Outcome, CliError> {
    let manifests = project.load_manifests()?;
    let graph = DependencyGraph::build(&manifests);
    logger::debug(&format!(
        "{} nodes, {} edges, {} dangling",
        graph.len(),
        graph.edge_count(),
        graph.dangling().len()
    ));

    let chart = match component_id {
        Some(id) if graph.contains(&id) => MermaidGraph::neighbourhood(&graph, &id),
        Some(id) => return Err(CliError::UnknownComponent(id)),
        None => MermaidGraph::full(&graph),
    };
    print!("{}", chart.source());
    Ok(Outcome::Success)
}
