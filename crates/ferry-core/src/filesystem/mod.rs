//! Per-container filesystem composition.
//!
//! A container's merged root is an overlay of the image's shared content
//! (read-only lower) under a private read-write layer, with `/proc`,
//! `/sys`, `/dev`, and minimal device nodes created on top.

pub mod devices;
pub mod mount;
pub mod overlay;
pub mod pivot;

use std::path::{Path, PathBuf};

use ferry_common::error::{FerryError, Result};
use ferry_common::types::ContainerId;
use serde::{Deserialize, Serialize};

/// The directory triple backing one container's overlay mount.
///
/// Created fresh per container id and never shared across containers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerDirs {
    /// Merged mount point that becomes the container's root.
    pub rootfs: PathBuf,
    /// Private read-write upper layer.
    pub cow_rw: PathBuf,
    /// Overlay work area.
    pub cow_workdir: PathBuf,
}

impl ContainerDirs {
    /// Creates the `{rootfs, cow_rw, cow_workdir}` triple under
    /// `<containersRoot>/<containerId>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn create(containers_root: &Path, id: &ContainerId) -> Result<Self> {
        let base = containers_root.join(id.as_str());
        let dirs = Self {
            rootfs: base.join("rootfs"),
            cow_rw: base.join("cow_rw"),
            cow_workdir: base.join("cow_workdir"),
        };
        for dir in [&dirs.rootfs, &dirs.cow_rw, &dirs.cow_workdir] {
            std::fs::create_dir_all(dir).map_err(|e| FerryError::io(dir, e))?;
        }
        tracing::debug!(base = %base.display(), "container directories created");
        Ok(dirs)
    }
}
