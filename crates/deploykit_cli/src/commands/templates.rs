//! Templates command - List available templates.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::load_registry;

#[derive(Args)]
pub struct TemplatesArgs {
    /// Only list templates carrying this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Directory of declarative templates
    #[arg(long)]
    templates_dir: Option<PathBuf>,

    /// Print metadata as JSON
    #[arg(long)]
    json: bool,
}

pub fn execute(args: TemplatesArgs) -> Result<()> {
    let registry = load_registry(args.templates_dir)?;

    let templates = match &args.tag {
        Some(tag) => registry.by_tag(tag),
        None => registry.list(),
    };
    info!("Listing {} template(s)", templates.len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&templates)?);
        return Ok(());
    }

    if templates.is_empty() {
        println!("No templates found");
        return Ok(());
    }

    for template in &templates {
        println!(
            "{:<16} {:<10} {}",
            template.id,
            template.version,
            template.tags.join(", ")
        );
    }

    Ok(())
}
