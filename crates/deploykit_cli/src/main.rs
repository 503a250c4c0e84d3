//! deploykit CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success (for `should-deploy`: deploy)
//! - 1: General error
//! - 2: Invalid arguments or configuration
//! - 4: Template error
//! - 5: Deployment skipped

use std::process::ExitCode;

use clap::Parser;
use deploykit_templates::TemplateError;
use deploykit_trigger::TriggerError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const SKIPPED: u8 = 5;
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deploykit={},warn", default_level)));

    // Logs go to stderr so stdout stays machine-readable.
    let log_result = if cli.log_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(filter)
            .try_init()
    };

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Templates(args) => commands::templates::execute(args).map(|()| ExitCodes::SUCCESS),
        Commands::Generate(args) => {
            commands::generate::execute(args, config_path).map(|()| ExitCodes::SUCCESS)
        }
        Commands::ShouldDeploy(args) => commands::should_deploy::execute(args).map(|deploy| {
            if deploy {
                ExitCodes::SUCCESS
            } else {
                ExitCodes::SKIPPED
            }
        }),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<TemplateError>() {
            return match err {
                TemplateError::InvalidConfig(_) | TemplateError::Toml(_) => ExitCodes::INVALID_ARGS,
                _ => ExitCodes::TEMPLATE_ERROR,
            };
        }
        if cause.downcast_ref::<TriggerError>().is_some() {
            return ExitCodes::INVALID_ARGS;
        }
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("template") {
        ExitCodes::TEMPLATE_ERROR
    } else if msg.contains("argument") || msg.contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
