use crate::common::Outcome;
use crate::errors::CliError;
use crate::project::Project;
use cireg_config::Config;
use cireg_logger as logger;
use cireg_manifest::DEFAULT_SCHEMA;
use colored::Colorize;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# cireg configuration
# Paths are relative to the project root. Uncomment a key to override its default.

# Directory holding one <component_id>.yaml manifest per component
# store-dir = "integrations"

# Schema document used by `cireg validate`
# schema-path = "integrations/registry.schema.json"

# Where `cireg exporters` writes <component_id>-exporter.js
# exporters-dir = "exporters"

# Where `cireg doc` writes documentation pages
# docs-dir = "docs/integrations"

# Owner stamped on scanned and generated manifests
# default-owner = "@platform-team"

# Directories visited by `cireg scan`
# scan-dirs = ["src", "app", "scripts", "mobile", "mcp-launcher", "cline-ai-orchestration"]

# Path segment to domain table; first match wins. Replaces the built-in table when set.
# [[domain-rules]]
# segment = "mobile"
# domain = "mobile"
"#;

/// Write the schema document and a commented config file
pub fn handle_init(force: bool, project: &Project) -> Result<Outcome, CliError> {
    let store_dir = project.store_dir();
    fs::create_dir_all(&store_dir).map_err(|e| CliError::io(&store_dir, e))?;

    let schema_path = project.config().schema_path(project.root());
    write_file(&schema_path, DEFAULT_SCHEMA, force, project)?;

    let config_path = Config::path(project.root());
    write_file(&config_path, CONFIG_TEMPLATE, force, project)?;

    logger::success(&format!(
        "Registry initialized in {}",
        project.display_path(&store_dir)
    ));
    Ok(Outcome::Success)
}

fn write_file(path: &Path, content: &str, force: bool, project: &Project) -> Result<(), CliError> {
    if path.exists() && !force {
        println!(
            "{} {} exists (use --force to overwrite)",
            "skip".yellow(),
            project.display_path(path)
        );
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| CliError::io(path, e))?;
    println!("{} {}", "created".green(), project.display_path(path));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cireg_manifest::Schema;
    use tempfile::TempDir;

    #[test]
    fn test_config_template_parses_as_defaults() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let path = temp_dir.path().join("cireg.toml");
        assert!(fs::write(&path, CONFIG_TEMPLATE).is_ok());
        assert!(Config::load_from_path(&path).is_ok_and(|c| c.is_empty()));
    }

    #[test]
    fn test_init_writes_schema_and_config() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let project = Project::new(temp_dir.path(), Config::default());
        assert!(matches!(handle_init(false, &project), Ok(Outcome::Success)));

        let schema_path = temp_dir.path().join("integrations/registry.schema.json");
        assert!(Schema::load(&schema_path).is_ok());
        assert!(temp_dir.path().join("cireg.toml").is_file());

        assert!(fs::write(&schema_path, "{}").is_ok());
        assert!(matches!(handle_init(false, &project), Ok(Outcome::Success)));
        assert_eq!(fs::read_to_string(&schema_path).ok().as_deref(), Some("{}"));

        assert!(matches!(handle_init(true, &project), Ok(Outcome::Success)));
        assert_eq!(
            fs::read_to_string(&schema_path).ok().as_deref(),
            Some(DEFAULT_SCHEMA)
        );
    }
}
