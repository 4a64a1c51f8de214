//! Command implementations

mod config;
mod resolve;
mod validate;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli.inputs)?;

    match cli.command {
        Commands::Resolve(args) => resolve::execute(args, &cli.inputs, &config, &output),
        Commands::Validate(args) => validate::execute(args, &cli.inputs, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}
