//! ml-stack CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Configuration error
//! - 4: Template error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mlstack_config::ConfigError;
use mlstack_iac::IacError;

mod cli;
mod generate;

use cli::Cli;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(ExitCodes::INVALID_ARGS)
            } else {
                ExitCode::from(ExitCodes::SUCCESS)
            };
        }
    };

    // Logs go to stderr so stdout carries only the template
    let filter = EnvFilter::new(cli.log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match generate::execute(&cli) {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if e.downcast_ref::<ConfigError>().is_some() {
        return ExitCodes::CONFIG_ERROR;
    }

    match e.downcast_ref::<IacError>() {
        Some(IacError::Config(_)) => ExitCodes::CONFIG_ERROR,
        Some(_) => ExitCodes::TEMPLATE_ERROR,
        None => ExitCodes::GENERAL_ERROR,
    }
}
