//! `ferry pull` — fetch an image into the local store.

use clap::Args;
use ferry_common::config::EngineConfig;
use ferry_runtime::Engine;

use crate::output;

/// Arguments for the `pull` command.
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Image name (`busybox`).
    pub image: String,

    /// Image tag.
    #[arg(default_value = "latest")]
    pub tag: String,
}

/// Executes the `pull` command.
///
/// # Errors
///
/// Returns an error if the pull fails.
pub fn execute(args: PullArgs) -> anyhow::Result<()> {
    eprintln!("Pulling {}:{} ...", args.image, args.tag);

    let engine = Engine::new(EngineConfig::default());
    let pulled = engine.pull(&args.image, &args.tag)?;

    output::status(&format!(
        "{}:{} pulled ({} layer(s))",
        args.image, args.tag, pulled.layer_count
    ));
    output::detail(&format!("content root: {}", pulled.content_root.display()));
    Ok(())
}
