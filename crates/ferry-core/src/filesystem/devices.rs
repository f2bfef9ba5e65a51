//! Device node population for the container's fresh `/dev`.
//!
//! A tmpfs-backed `/dev` starts empty, and most programs assume the
//! standard nodes exist, so the minimal set is created explicitly.

use std::path::Path;

use ferry_common::error::Result;

/// Standard character devices with their documented major/minor numbers.
#[cfg(target_os = "linux")]
const CHAR_DEVICES: [(&str, u64, u64); 7] = [
    ("null", 1, 3),
    ("zero", 1, 5),
    ("full", 1, 7),
    ("random", 1, 8),
    ("urandom", 1, 9),
    ("tty", 5, 0),
    ("console", 5, 1),
];

/// Populates `dev_dir` with standard stream symlinks and device nodes.
///
/// stdin/stdout/stderr become symlinks to the process's own
/// `/proc/self/fd` entries; the character devices in [`CHAR_DEVICES`]
/// are created via `mknod(2)` with mode 0666.
///
/// # Errors
///
/// Returns `FerryError::Io` if a symlink cannot be created and
/// `FerryError::Privilege` if `mknod(2)` fails.
#[cfg(target_os = "linux")]
pub fn populate_dev(dev_dir: &Path) -> Result<()> {
    use std::os::unix::fs::symlink;

    use ferry_common::error::FerryError;
    use nix::sys::stat::{Mode, SFlag, makedev, mknod};

    for (name, fd) in [("stdin", 0), ("stdout", 1), ("stderr", 2)] {
        let link = dev_dir.join(name);
        symlink(format!("/proc/self/fd/{fd}"), &link).map_err(|e| FerryError::io(&link, e))?;
    }

    for (name, major, minor) in CHAR_DEVICES {
        let node = dev_dir.join(name);
        mknod(
            &node,
            SFlag::S_IFCHR,
            Mode::from_bits_truncate(0o666),
            makedev(major, minor),
        )
        .map_err(|e| FerryError::Privilege {
            message: format!("mknod {} failed: {e}", node.display()),
        })?;
    }
    tracing::debug!(dev = %dev_dir.display(), "device nodes populated");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — device node creation requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn populate_dev(_dev_dir: &Path) -> Result<()> {
    Err(ferry_common::error::FerryError::Precondition {
        message: "Linux is required for container isolation".into(),
    })
}
