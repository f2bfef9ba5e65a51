//! `ferry run` — launch a command inside an isolated container.

use clap::Args;
use ferry_common::config::EngineConfig;
use ferry_common::types::{ResourceLimits, parse_memory_limit};
use ferry_runtime::Engine;

use crate::output;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image name (`busybox`). Must have been pulled first.
    pub image: String,

    /// Image tag.
    #[arg(long, default_value = "latest")]
    pub tag: String,

    /// CPU share as a fraction of one core (values above 1.0 burst
    /// across multiple cores).
    #[arg(long)]
    pub cpus: Option<f64>,

    /// Memory ceiling (`100m`, `2g`, or plain bytes); swap is disabled
    /// at the same value.
    #[arg(long)]
    pub memory: Option<String>,

    /// Command vector to execute inside the container.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Executes the `run` command and exits with the container's status.
///
/// # Errors
///
/// Returns an error if the limits are malformed or the launch fails
/// before the child is spawned.
pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let memory_bytes = match &args.memory {
        Some(s) => Some(
            parse_memory_limit(s)
                .ok_or_else(|| anyhow::anyhow!("invalid memory limit: {s}"))?,
        ),
        None => None,
    };
    let limits = ResourceLimits {
        cpus: args.cpus,
        memory_bytes,
    };

    eprintln!("Starting {}:{} ...", args.image, args.tag);
    let engine = Engine::new(EngineConfig::default());
    let status = engine.run(&args.image, &args.tag, limits, args.command)?;

    if status == 0 {
        output::status(&format!("container exited with status {status}"));
    } else {
        eprintln!(
            "  {}●{} container exited with status {status}",
            output::RED,
            output::RESET
        );
    }
    std::process::exit(status)
}
