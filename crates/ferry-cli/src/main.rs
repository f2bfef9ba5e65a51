//! # ferry — minimal container engine CLI
//!
//! Fetches container images from a registry and launches them as
//! isolated processes using namespaces, an overlay filesystem, and
//! cgroup limits.

mod commands;
mod output;

use clap::Parser;

use crate::commands::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    commands::execute(cli)
}
