use cireg::{
    commands::{
        config::{self, ConfigAction},
        doc, exporters, generate, graph, init, scan, validate,
    },
    init_tracing, logger, CliError, GlobalOpts, Outcome, Project,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cireg")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Integration manifest registry",
    long_about = "cireg keeps one manifest per component, validates them, and generates metrics exporters and documentation from them."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find components without a manifest
    Scan {
        /// Write skeleton manifests (implied when CI=true)
        #[arg(long)]
        auto: bool,
    },
    /// Validate every manifest against the schema
    Validate,
    /// Create a minimal manifest for a component
    Generate {
        component_id: Option<String>,
        /// Overwrite an existing manifest
        #[arg(short, long)]
        force: bool,
    },
    /// Generate metrics exporters for manifests declaring a namespace
    Exporters,
    /// Generate Markdown documentation
    Doc {
        /// Output directory (default: the configured docs dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the dependency graph as Mermaid
    Graph {
        /// Only show this component and its direct neighbours
        component_id: Option<String>,
    },
    /// Write the schema document and a config template
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
    /// Inspect configuration
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = cli.global.verbosity_level();

    if let Err(e) = logger::init_with_verbosity(verbosity) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing();

    match run(cli) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Failure) => ExitCode::FAILURE,
        Err(e) => {
            logger::error(&e.to_string());
            if verbosity > 0 {
                logger::show_log_path();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Outcome, CliError> {
    let project = Project::load(&cli.global)?;

    match cli.command {
        Commands::Scan { auto } => scan::handle_scan(auto, &project),
        Commands::Validate => validate::handle_validate(&project),
        Commands::Generate {
            component_id,
            force,
        } => generate::handle_generate(component_id, force, &project),
        Commands::Exporters => exporters::handle_exporters(&project),
        Commands::Doc { out } => doc::handle_doc(out, &project),
        Commands::Graph { component_id } => graph::handle_graph(component_id, &project),
        Commands::Init { force } => init::handle_init(force, &project),
        Commands::Config { action } => config::handle_config(action, &project, &cli.global),
    }
}
