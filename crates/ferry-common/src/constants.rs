//! System-wide constants and default paths.

/// Default directory holding pulled manifests and layer content.
pub const DEFAULT_IMAGES_ROOT: &str = "/var/lib/ferry/images";

/// Default directory holding per-container overlay directories.
pub const DEFAULT_CONTAINERS_ROOT: &str = "/var/lib/ferry/containers";

/// Default cpu controller hierarchy for ferry containers (cgroup v1).
pub const DEFAULT_CGROUP_CPU_ROOT: &str = "/sys/fs/cgroup/cpu/ferry";

/// Default memory controller hierarchy for ferry containers (cgroup v1).
pub const DEFAULT_CGROUP_MEMORY_ROOT: &str = "/sys/fs/cgroup/memory/ferry";

/// Docker Hub registry API base (v2, manifest schema 1).
pub const DEFAULT_REGISTRY_BASE: &str = "https://registry-1.docker.io/v2";

/// Docker Hub token service base.
pub const DEFAULT_AUTH_BASE: &str = "https://auth.docker.io";

/// Registry service name used in token scope requests.
pub const REGISTRY_SERVICE: &str = "registry.docker.io";

/// Default repository namespace for bare image names (`busybox` →
/// `library/busybox`).
pub const DEFAULT_NAMESPACE: &str = "library";

/// Application name used in CLI output.
pub const APP_NAME: &str = "ferry";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "ferry";
