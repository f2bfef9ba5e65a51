//! Mount operations for container filesystem setup.
//!
//! Makes the root mount private before any container mount, then mounts
//! the `/proc`, `/sys`, and `/dev` pseudo-filesystems inside the
//! container's root.

use std::path::Path;

use ferry_common::error::Result;

/// Remounts `/` as a private, recursive mount point.
///
/// Must happen before any further mount so that nothing the container
/// mounts or unmounts propagates to the host's mount table.
///
/// # Errors
///
/// Returns `FerryError::Privilege` if the `mount(2)` syscall fails.
#[cfg(target_os = "linux")]
pub fn make_root_private() -> Result<()> {
    use nix::mount::{MsFlags, mount};

    mount(
        None::<&str>,
        "/",
        None::<&str>,
        MsFlags::MS_PRIVATE | MsFlags::MS_REC,
        None::<&str>,
    )
    .map_err(|e| ferry_common::error::FerryError::Privilege {
        message: format!("remounting / private failed: {e}"),
    })?;
    tracing::debug!("/ remounted private");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — mount propagation control requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn make_root_private() -> Result<()> {
    Err(ferry_common::error::FerryError::Precondition {
        message: "Linux is required for container isolation".into(),
    })
}

/// Mounts `proc`, `sysfs`, and a `tmpfs`-backed `/dev` under `root`.
///
/// The `/dev` tmpfs is mounted no-suid, strict-atime, mode 0755; it
/// starts empty and is populated by
/// [`crate::filesystem::devices::populate_dev`].
///
/// # Errors
///
/// Returns an error if directory creation or any mount syscall fails.
#[cfg(target_os = "linux")]
pub fn mount_system_dirs(root: &Path) -> Result<()> {
    use ferry_common::error::FerryError;
    use nix::mount::{MsFlags, mount};

    let proc_dir = root.join("proc");
    let sys_dir = root.join("sys");
    let dev_dir = root.join("dev");
    for dir in [&proc_dir, &sys_dir, &dev_dir] {
        std::fs::create_dir_all(dir).map_err(|e| FerryError::io(dir, e))?;
    }

    let privilege = |what: &str, e: nix::errno::Errno| FerryError::Privilege {
        message: format!("mounting {what} failed: {e}"),
    };
    tracing::debug!(root = %root.display(), "mounting /proc");
    mount(
        Some("proc"),
        &proc_dir,
        Some("proc"),
        MsFlags::empty(),
        None::<&str>,
    )
    .map_err(|e| privilege("proc", e))?;
    tracing::debug!(root = %root.display(), "mounting /sys");
    mount(
        Some("sysfs"),
        &sys_dir,
        Some("sysfs"),
        MsFlags::empty(),
        None::<&str>,
    )
    .map_err(|e| privilege("sysfs", e))?;
    tracing::debug!(root = %root.display(), "mounting /dev");
    mount(
        Some("tmpfs"),
        &dev_dir,
        Some("tmpfs"),
        MsFlags::MS_NOSUID | MsFlags::MS_STRICTATIME,
        Some("mode=755"),
    )
    .map_err(|e| privilege("dev tmpfs", e))?;
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — pseudo-filesystem mounts require Linux.
#[cfg(not(target_os = "linux"))]
pub fn mount_system_dirs(_root: &Path) -> Result<()> {
    Err(ferry_common::error::FerryError::Precondition {
        message: "Linux is required for container isolation".into(),
    })
}
