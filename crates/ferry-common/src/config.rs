//! Global configuration model for the Ferry engine.
//!
//! Every component receives its paths from an [`EngineConfig`] at
//! construction; there are no process-wide mutable path globals, which is
//! what makes isolated test roots possible.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the Ferry engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding pulled manifests and extracted layer content.
    pub images_root: PathBuf,
    /// Directory holding per-container overlay directories.
    pub containers_root: PathBuf,
    /// Cpu controller hierarchy for ferry containers.
    pub cgroup_cpu_root: PathBuf,
    /// Memory controller hierarchy for ferry containers.
    pub cgroup_memory_root: PathBuf,
    /// Registry API base URL (includes the `/v2` prefix).
    pub registry_base: String,
    /// Token service base URL.
    pub auth_base: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            images_root: PathBuf::from(crate::constants::DEFAULT_IMAGES_ROOT),
            containers_root: PathBuf::from(crate::constants::DEFAULT_CONTAINERS_ROOT),
            cgroup_cpu_root: PathBuf::from(crate::constants::DEFAULT_CGROUP_CPU_ROOT),
            cgroup_memory_root: PathBuf::from(crate::constants::DEFAULT_CGROUP_MEMORY_ROOT),
            registry_base: crate::constants::DEFAULT_REGISTRY_BASE.to_string(),
            auth_base: crate::constants::DEFAULT_AUTH_BASE.to_string(),
        }
    }
}

impl EngineConfig {
    /// Builds a configuration rooted entirely under `base`, used by tests
    /// to keep all state inside a temporary directory.
    #[must_use]
    pub fn rooted_at(base: &std::path::Path) -> Self {
        Self {
            images_root: base.join("images"),
            containers_root: base.join("containers"),
            cgroup_cpu_root: base.join("cgroup/cpu"),
            cgroup_memory_root: base.join("cgroup/memory"),
            ..Self::default()
        }
    }
}
