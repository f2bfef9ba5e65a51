//! The startup descriptor handed to the container child.
//!
//! Plain serializable data: the child entry point receives everything it
//! needs by value and captures no parent-process state implicitly.

use std::path::PathBuf;

use ferry_common::types::{ContainerId, ResourceLimits};
use ferry_core::filesystem::ContainerDirs;
use serde::{Deserialize, Serialize};

/// Everything the child needs to compose, isolate, and exec a container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupDescriptor {
    /// Unique id; also becomes the container's hostname.
    pub container_id: ContainerId,
    /// The image's shared extracted content tree (the overlay lower dir).
    pub image_content: PathBuf,
    /// Per-container overlay directory triple.
    pub dirs: ContainerDirs,
    /// Cpu and memory ceilings to install before any mount.
    pub limits: ResourceLimits,
    /// Command vector that replaces the child's process image.
    pub command: Vec<String>,
    /// Cpu controller hierarchy to create the container's group under.
    pub cgroup_cpu_root: PathBuf,
    /// Memory controller hierarchy to create the container's group under.
    pub cgroup_memory_root: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_round_trips_through_json() {
        let descriptor = StartupDescriptor {
            container_id: ContainerId::new("busybox_latest_0000"),
            image_content: PathBuf::from("/images/library_busybox_latest/layers/contents"),
            dirs: ContainerDirs {
                rootfs: PathBuf::from("/containers/x/rootfs"),
                cow_rw: PathBuf::from("/containers/x/cow_rw"),
                cow_workdir: PathBuf::from("/containers/x/cow_workdir"),
            },
            limits: ResourceLimits {
                cpus: Some(0.5),
                memory_bytes: Some(100 * 1024 * 1024),
            },
            command: vec!["/bin/echo".into(), "hi".into()],
            cgroup_cpu_root: PathBuf::from("/sys/fs/cgroup/cpu/ferry"),
            cgroup_memory_root: PathBuf::from("/sys/fs/cgroup/memory/ferry"),
        };

        let json = serde_json::to_string(&descriptor).expect("serialize");
        let back: StartupDescriptor = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.container_id, descriptor.container_id);
        assert_eq!(back.command, descriptor.command);
        assert_eq!(back.limits, descriptor.limits);
    }
}
