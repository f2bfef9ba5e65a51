//! CLI command definitions and dispatch.

pub mod pull;
pub mod run;

use clap::{Parser, Subcommand};

/// Ferry — minimal container engine.
#[derive(Parser, Debug)]
#[command(name = "ferry", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch an image's manifest and layers into the local store.
    Pull(pull::PullArgs),
    /// Launch a command inside an isolated container of a pulled image.
    Run(run::RunArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Pull(args) => pull::execute(args),
        Command::Run(args) => run::execute(args),
    }
}
