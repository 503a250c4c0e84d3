//! CLI command definitions.
//!
//! Each subcommand wraps one operation of the template and trigger crates.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use deploykit_templates::{GeneratorConfig, TemplateLoader, TemplateRegistry};

pub mod generate;
pub mod should_deploy;
pub mod templates;

/// deploykit - template resolution and deploy triggers
#[derive(Parser)]
#[command(name = "deploykit")]
#[command(version, about = "deploykit - template resolution and deploy triggers")]
#[command(long_about = r#"
deploykit resolves one-click application templates into deployment manifests
and decides whether a push should trigger an automatic deployment.

COMMANDS:
  templates      → List available templates
  generate       → Generate a manifest for a template
  should-deploy  → Check changed files against watch paths

EXIT CODES:
  0 - Success (should-deploy: deploy)
  1 - General error
  2 - Invalid arguments or configuration
  4 - Template error
  5 - Deployment skipped
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Generator configuration file (TOML)
    #[arg(long, global = true, env = "DEPLOYKIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available templates
    Templates(templates::TemplatesArgs),

    /// Generate the manifest for a template
    Generate(generate::GenerateArgs),

    /// Decide whether changed files should trigger a deployment
    #[command(name = "should-deploy")]
    ShouldDeploy(should_deploy::ShouldDeployArgs),
}

/// Load the generator configuration, then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let config = match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => GeneratorConfig::default(),
    };
    config
        .with_env_overrides()
        .context("Invalid base domain override")
}

/// Built-in templates plus any declarative templates found on disk.
///
/// An explicit directory must exist; the default `./templates` is optional.
pub fn load_registry(templates_dir: Option<PathBuf>) -> Result<TemplateRegistry> {
    let mut registry = TemplateRegistry::builtin();

    let templates_path = match templates_dir {
        Some(dir) => {
            if !dir.is_dir() {
                anyhow::bail!("Templates directory not found: {:?}", dir);
            }
            dir
        }
        None => {
            let default = std::env::current_dir()?.join("templates");
            if !default.is_dir() {
                debug!("No templates directory at {:?}, using built-ins only", default);
                return Ok(registry);
            }
            default
        }
    };

    TemplateLoader::new(&templates_path)
        .register_all(&mut registry)
        .with_context(|| format!("Failed to register templates from {:?}", templates_path))?;
    Ok(registry)
}

/// Parse `KEY<sep>VALUE`, trimming both sides.
pub fn parse_pair(input: &str, sep: char) -> Result<(String, String), String> {
    let (key, value) = input
        .split_once(sep)
        .ok_or_else(|| format!("expected KEY{}VALUE, got {:?}", sep, input))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in {:?}", input));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
