//! The pull/run facade consumed by the CLI.
//!
//! One `Engine` per invocation; every component below it receives its
//! paths and endpoints from the [`EngineConfig`] at construction.

use ferry_common::config::EngineConfig;
use ferry_common::constants::DEFAULT_NAMESPACE;
use ferry_common::error::{FerryError, Result};
use ferry_common::types::{ContainerId, ResourceLimits};
use ferry_core::filesystem::ContainerDirs;
use ferry_image::manifest::image_slug;
use ferry_image::{ImagePuller, LayerStore, PulledImage, RegistryClient};

use crate::descriptor::StartupDescriptor;
use crate::launcher;

/// Coordinates the image pipeline and the container launcher.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine over the given configuration.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn store(&self) -> LayerStore {
        LayerStore::new(&self.config.images_root)
    }

    /// Pulls `image:tag` from the configured registry into the images
    /// root.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::Network` on registry failures,
    /// `FerryError::HashMismatch` on a corrupted layer download, and
    /// `FerryError::Archive` on an unpackable layer.
    pub fn pull(&self, image: &str, tag: &str) -> Result<PulledImage> {
        let client = RegistryClient::new(
            &self.config.registry_base,
            &self.config.auth_base,
            DEFAULT_NAMESPACE,
        );
        ImagePuller::new(client, self.store()).pull(image, tag)
    }

    /// Runs `command` in a freshly isolated container of `image:tag` and
    /// returns the container's exit status.
    ///
    /// The image content is resolved before any side effect: running an
    /// unpulled image fails without creating directories, mounts, or
    /// cgroups. The call blocks for the container's entire lifetime.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::Precondition` if the image was never pulled
    /// or the command is empty, and `FerryError::Privilege` if the
    /// isolated spawn fails.
    pub fn run(
        &self,
        image: &str,
        tag: &str,
        limits: ResourceLimits,
        command: Vec<String>,
    ) -> Result<i32> {
        let slug = image_slug(&format!("{DEFAULT_NAMESPACE}/{image}"), tag);
        let image_content = self.store().contents_dir(&slug);
        if !image_content.is_dir() {
            return Err(FerryError::Precondition {
                message: format!("image not pulled: {image}:{tag}"),
            });
        }
        if command.is_empty() {
            return Err(FerryError::Precondition {
                message: "no command to execute".into(),
            });
        }

        let container_id = ContainerId::generate(image, tag);
        let dirs = ContainerDirs::create(&self.config.containers_root, &container_id)?;
        let descriptor = StartupDescriptor {
            container_id: container_id.clone(),
            image_content,
            dirs,
            limits,
            command,
            cgroup_cpu_root: self.config.cgroup_cpu_root.clone(),
            cgroup_memory_root: self.config.cgroup_memory_root.clone(),
        };

        let pid = launcher::spawn(descriptor)?;
        tracing::info!(%container_id, pid = pid.as_raw(), "container started");
        launcher::wait(pid)
    }
}
