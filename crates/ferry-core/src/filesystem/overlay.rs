//! `OverlayFS` mounting for the per-container merged root.
//!
//! The image's shared content tree is the single read-only lower layer;
//! every write lands in the container's private upper layer.

use std::path::Path;

use ferry_common::error::Result;

/// Overlay-mounts `lower` (read-only) under `upper` at `target`.
///
/// `upper` and `work` must be empty directories on an overlay-capable
/// filesystem; incompatibility surfaces as the mount failure itself, not
/// as pre-validation here.
///
/// # Errors
///
/// Returns `FerryError::Privilege` if the `mount(2)` syscall fails.
#[cfg(target_os = "linux")]
pub fn mount_overlay(lower: &Path, upper: &Path, work: &Path, target: &Path) -> Result<()> {
    use nix::mount::{MsFlags, mount};

    let opts = format!(
        "lowerdir={},upperdir={},workdir={}",
        lower.display(),
        upper.display(),
        work.display()
    );
    mount(
        Some("overlay"),
        target,
        Some("overlay"),
        MsFlags::MS_NODEV,
        Some(opts.as_str()),
    )
    .map_err(|e| ferry_common::error::FerryError::Privilege {
        message: format!("overlay mount on {} failed: {e}", target.display()),
    })?;
    tracing::info!(target = %target.display(), "overlayfs mounted");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — `OverlayFS` mounting requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn mount_overlay(_lower: &Path, _upper: &Path, _work: &Path, _target: &Path) -> Result<()> {
    Err(ferry_common::error::FerryError::Precondition {
        message: "Linux is required for container isolation".into(),
    })
}
