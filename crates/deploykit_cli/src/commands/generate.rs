//! Generate command - Print the manifest for one template.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use deploykit_templates::{GeneratorContext, RandomSource, Schema, SeededRandom, ThreadRandom};

use super::{load_config, load_registry, parse_pair};

fn parse_meta(input: &str) -> Result<(String, String), String> {
    parse_pair(input, '=')
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Template name
    pub name: String,

    /// Project name used for identifiers and domains
    #[arg(short, long)]
    pub project_name: String,

    /// Server IP embedded in generated domains
    #[arg(long)]
    pub server_ip: Option<String>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Extra schema metadata (KEY=VALUE, repeatable)
    #[arg(long, value_parser = parse_meta)]
    pub meta: Vec<(String, String)>,

    /// Override the base domain for generated hosts
    #[arg(long)]
    pub base_domain: Option<String>,

    /// Directory of declarative templates
    #[arg(long)]
    pub templates_dir: Option<PathBuf>,
}

pub fn execute(args: GenerateArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(base_domain) = args.base_domain {
        config = config.with_base_domain(base_domain)?;
    }
    let registry = load_registry(args.templates_dir)?;

    let mut schema = Schema::new(&args.project_name);
    if let Some(ip) = args.server_ip {
        schema = schema.with_server_ip(ip);
    }
    for (key, value) in args.meta {
        schema = schema.with_metadata(key, value);
    }

    let random: Box<dyn RandomSource> = match args.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom),
    };
    let ctx = GeneratorContext::new(&config, random.as_ref());

    info!("Generating template {} for {:?}", args.name, args.project_name);
    let template = registry
        .generate(&args.name, &schema, &ctx)
        .with_context(|| format!("Failed to generate template {}", args.name))?;

    println!("{}", serde_json::to_string_pretty(&template)?);
    Ok(())
}
