//! Should-deploy command - Check a push against watch paths.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use deploykit_trigger::{is_ping, DeployDecision, DeployGate, GitProvider, PushEvent};

use super::parse_pair;

fn parse_header(input: &str) -> Result<(String, String), String> {
    parse_pair(input, ':')
}

#[derive(Args)]
pub struct ShouldDeployArgs {
    /// Watch path pattern (repeatable); none means every push deploys
    #[arg(short, long = "watch")]
    pub watch: Vec<String>,

    /// Changed file path (repeatable)
    #[arg(
        short,
        long = "file",
        required_unless_present = "payload",
        conflicts_with = "payload"
    )]
    pub file: Vec<String>,

    /// Webhook payload (JSON) to read changed files from
    #[arg(long)]
    pub payload: Option<PathBuf>,

    /// Webhook request header (NAME: VALUE, repeatable)
    #[arg(long, value_parser = parse_header, requires = "payload")]
    pub header: Vec<(String, String)>,

    /// Provider of the payload when no headers are given
    #[arg(long, requires = "payload")]
    pub provider: Option<GitProvider>,

    /// Print the decision as JSON
    #[arg(long)]
    pub json: bool,
}

/// Returns whether the push should deploy.
pub fn execute(args: ShouldDeployArgs) -> Result<bool> {
    let gate = DeployGate::new(args.watch.as_slice());

    let decision = match &args.payload {
        Some(path) => {
            if is_ping(args.header.iter().map(|(k, v)| (k, v))) {
                println!("skip: ping event");
                return Ok(false);
            }

            let body = fs::read(path).with_context(|| format!("Failed to read payload {:?}", path))?;
            let event = match args.provider {
                Some(provider) => PushEvent::from_slice(provider, &body)?,
                None => PushEvent::from_request(args.header.iter().map(|(k, v)| (k, v)), &body)?,
            };
            info!(
                "{} push to {} ({})",
                event.provider,
                event.branch.as_deref().unwrap_or("unknown branch"),
                event.commit_hash.as_deref().unwrap_or("unknown commit")
            );
            gate.evaluate(event.changed_files())
        }
        None => gate.evaluate(Some(args.file.as_slice())),
    };

    report(&decision, args.json)?;
    Ok(decision.deploy)
}

fn report(decision: &DeployDecision, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(decision)?);
    } else {
        println!("{}", decision.summary());
    }
    Ok(())
}
