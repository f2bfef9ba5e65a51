//! Root switching via `pivot_root(2)`.
//!
//! The new root must already be a mount point, which the prior overlay
//! mount guarantees. After the switch the old root subtree is lazily
//! detached and its now-empty mount point removed, leaving no trace of
//! the pre-pivot root.

use std::path::Path;

use ferry_common::error::Result;

/// Switches the process root to `new_root` and discards the old root.
///
/// `put_old` is created as `new_root/old_root`, satisfying the
/// `pivot_root(2)` requirement that it be a subdirectory of the new root.
///
/// # Errors
///
/// Returns `FerryError::Privilege` if `pivot_root(2)`, `chdir(2)`, or the
/// detach of the old root fails.
#[cfg(target_os = "linux")]
pub fn switch_root(new_root: &Path) -> Result<()> {
    use ferry_common::error::FerryError;
    use nix::mount::{MntFlags, umount2};
    use nix::unistd::{chdir, pivot_root};

    let put_old = new_root.join("old_root");
    std::fs::create_dir_all(&put_old).map_err(|e| FerryError::io(&put_old, e))?;

    tracing::info!(new_root = %new_root.display(), "performing pivot_root");
    pivot_root(new_root, &put_old).map_err(|e| FerryError::Privilege {
        message: format!("pivot_root to {} failed: {e}", new_root.display()),
    })?;
    chdir("/").map_err(|e| FerryError::Privilege {
        message: format!("chdir to new root failed: {e}"),
    })?;
    umount2("/old_root", MntFlags::MNT_DETACH).map_err(|e| FerryError::Privilege {
        message: format!("detaching old root failed: {e}"),
    })?;
    std::fs::remove_dir("/old_root").map_err(|e| FerryError::io("/old_root", e))?;
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — `pivot_root(2)` requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn switch_root(_new_root: &Path) -> Result<()> {
    Err(ferry_common::error::FerryError::Precondition {
        message: "Linux is required for container isolation".into(),
    })
}
