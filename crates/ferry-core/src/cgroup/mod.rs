//! Cgroup resource management (v1 controller layout).
//!
//! Each container gets a subdirectory under the per-controller hierarchy
//! (`/sys/fs/cgroup/cpu/ferry/<id>`, `/sys/fs/cgroup/memory/ferry/<id>`).
//! The current process is registered into the group's `tasks` file at
//! creation, before any limit is written; the limit setters take a
//! [`CgroupHandle`], which only exists after registration. Any cgroup
//! file write failure is fatal to container startup — there is no
//! fallback to "unlimited".

pub mod cpu;
pub mod memory;

use std::path::{Path, PathBuf};

use ferry_common::error::{FerryError, Result};
use ferry_common::types::ContainerId;

/// Handle to one container's group under a single controller hierarchy.
#[derive(Debug)]
pub struct CgroupHandle {
    controller_root: PathBuf,
    path: PathBuf,
}

impl CgroupHandle {
    /// Creates the container's group under `controller_root` and registers
    /// the current process into its `tasks` file.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::Precondition` if the controller hierarchy is
    /// missing, or an I/O error if the group cannot be created or the
    /// process cannot be registered.
    pub fn create(controller_root: &Path, id: &ContainerId) -> Result<Self> {
        if !controller_root.is_dir() {
            return Err(FerryError::Precondition {
                message: format!(
                    "cgroup hierarchy missing: {}",
                    controller_root.display()
                ),
            });
        }
        let path = controller_root.join(id.as_str());
        std::fs::create_dir_all(&path).map_err(|e| FerryError::io(&path, e))?;

        let tasks = path.join("tasks");
        std::fs::write(&tasks, std::process::id().to_string())
            .map_err(|e| FerryError::io(&tasks, e))?;
        tracing::info!(path = %path.display(), "cgroup created and process registered");
        Ok(Self {
            controller_root: controller_root.to_path_buf(),
            path,
        })
    }

    /// Returns the group's directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads a control file from the controller hierarchy root.
    pub(crate) fn read_root_control(&self, name: &str) -> Result<String> {
        let file = self.controller_root.join(name);
        std::fs::read_to_string(&file).map_err(|e| FerryError::io(&file, e))
    }

    /// Writes a control file inside this group.
    pub(crate) fn write_control(&self, name: &str, value: &str) -> Result<()> {
        let file = self.path.join(name);
        std::fs::write(&file, value).map_err(|e| FerryError::io(&file, e))?;
        tracing::debug!(file = %file.display(), value, "cgroup limit written");
        Ok(())
    }
}
