use crate::common::Outcome;
use crate::errors::CliError;
use crate::project::Project;
use crate::GlobalOpts;
use cireg_config::Config;
use clap::Subcommand;
use colored::Colorize;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the resolved configuration
    Show,
    /// Print the path of the configuration file
    Path,
}

pub fn handle_config(
    action: Option<ConfigAction>,
    project: &Project,
    opts: &GlobalOpts,
) -> Result<Outcome, CliError> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            println!("{}", "Configuration:".bold().green());
            for (key, value) in resolved_values(project) {
                println!("  {}: {}", key.cyan(), value);
            }

            let config = project.config();
            if config.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(all defaults)".yellow());
                }
            } else {
                println!();
                println!(
                    "{}",
                    format!("Set in {}:", project.display_path(&Config::path(project.root())))
                        .bold()
                );
                for (key, value) in config.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::path(project.root()).display());
        }
    }
    Ok(Outcome::Success)
}

/// Every setting with its effective value, relative to the project root
fn resolved_values(project: &Project) -> Vec<(&'static str, String)> {
    let config = project.config();
    let root = project.root();
    let scan_dirs = config
        .scan_dirs(root)
        .iter()
        .map(|d| project.display_path(d))
        .collect::<Vec<_>>()
        .join(", ");

    vec![
        ("store-dir", project.display_path(&config.store_dir(root))),
        ("schema-path", project.display_path(&config.schema_path(root))),
        ("exporters-dir", project.display_path(&config.exporters_dir(root))),
        ("docs-dir", project.display_path(&config.docs_dir(root))),
        ("default-owner", config.default_owner().to_string()),
        ("scan-dirs", scan_dirs),
    ]
}
