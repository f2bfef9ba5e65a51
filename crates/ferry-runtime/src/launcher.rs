//! The container launch state machine.
//!
//! INIT → NAMESPACED → CGROUP_BOUND → FS_COMPOSED → ROOTED → RUNNING,
//! with a terminal ABORTED state reachable from NAMESPACED through
//! ROOTED. The parent's only duty after spawn is to block until EXITED
//! and report the status.
//!
//! Any failure between NAMESPACED and RUNNING terminates the child
//! immediately with a non-zero status and a printed diagnostic. This is
//! deliberate: mounts and namespaces inside a partially pivoted root
//! cannot be safely unwound, so there is no structured error propagation
//! back out of the child.

use std::convert::Infallible;
use std::ffi::CString;
use std::fmt;

use ferry_common::error::{FerryError, Result};
use ferry_core::cgroup::{self, CgroupHandle};
use ferry_core::filesystem::{devices, mount, overlay, pivot};
use ferry_core::namespace::{self, NamespaceSet};
use nix::unistd::Pid;

use crate::descriptor::StartupDescriptor;

/// Phase of child-side setup, named in abort diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    /// Fresh namespaces entered; hostname being claimed.
    Namespaced,
    /// Cgroup creation and limit installation.
    CgroupBound,
    /// Overlay, system mounts, and device nodes.
    FsComposed,
    /// Root switch and exec.
    Rooted,
}

impl fmt::Display for LaunchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Namespaced => write!(f, "namespace setup"),
            Self::CgroupBound => write!(f, "cgroup binding"),
            Self::FsComposed => write!(f, "filesystem composition"),
            Self::Rooted => write!(f, "root switch"),
        }
    }
}

/// Spawns the container child (INIT → NAMESPACED).
///
/// The descriptor is moved into the child entry point; there is no other
/// shared state with the parent.
///
/// # Errors
///
/// Returns `FerryError::Privilege` if the namespace-aware spawn fails.
pub fn spawn(descriptor: StartupDescriptor) -> Result<Pid> {
    namespace::spawn_isolated(NamespaceSet::default(), move || container_entry(&descriptor))
}

/// Blocks until the container exits and returns its status (EXITED).
///
/// A signal-terminated child is reported shell-style as 128 + signo.
/// There is no timeout or cancellation; a hung container blocks the
/// caller indefinitely.
///
/// # Errors
///
/// Returns an error if `waitpid(2)` itself fails.
pub fn wait(pid: Pid) -> Result<i32> {
    use nix::sys::wait::{WaitStatus, waitpid};

    loop {
        let status = waitpid(pid, None).map_err(|e| FerryError::Privilege {
            message: format!("waitpid for {pid} failed: {e}"),
        })?;
        match status {
            WaitStatus::Exited(_, code) => {
                tracing::info!(pid = pid.as_raw(), code, "container exited");
                return Ok(code);
            }
            WaitStatus::Signaled(_, signal, _) => {
                tracing::info!(pid = pid.as_raw(), %signal, "container killed by signal");
                return Ok(128 + signal as i32);
            }
            _ => {}
        }
    }
}

/// Child entry point: runs the setup sequence and execs the command.
///
/// The return value becomes the child's exit status; on a successful
/// exec there is no return into this code at all. On any error the
/// child prints a diagnostic and exits non-zero (ABORTED).
fn container_entry(descriptor: &StartupDescriptor) -> isize {
    match setup_and_exec(descriptor) {
        Ok(_) => 0,
        Err((phase, e)) => {
            eprintln!(
                "container {} aborted during {phase}: {e}",
                descriptor.container_id
            );
            1
        }
    }
}

/// NAMESPACED → CGROUP_BOUND → FS_COMPOSED → ROOTED → RUNNING,
/// strictly in that order.
fn setup_and_exec(
    d: &StartupDescriptor,
) -> std::result::Result<Infallible, (LaunchPhase, FerryError)> {
    // NAMESPACED: claim the hostname inside the fresh UTS namespace.
    namespace::set_hostname(d.container_id.as_str())
        .map_err(|e| (LaunchPhase::Namespaced, e))?;

    // CGROUP_BOUND: register self, then install limits. A controller
    // whose limit is absent gets no group at all.
    bind_cgroups(d).map_err(|e| (LaunchPhase::CgroupBound, e))?;

    // FS_COMPOSED: private root first, then overlay, system mounts, and
    // device nodes. The overlay makes the rootfs a mount point, which
    // the pivot below requires.
    compose_filesystem(d).map_err(|e| (LaunchPhase::FsComposed, e))?;

    // ROOTED → RUNNING: switch root, then replace the process image.
    pivot::switch_root(&d.dirs.rootfs).map_err(|e| (LaunchPhase::Rooted, e))?;
    exec_command(&d.command).map_err(|e| (LaunchPhase::Rooted, e))
}

fn bind_cgroups(d: &StartupDescriptor) -> Result<()> {
    if let Some(fraction) = d.limits.cpus {
        let handle = CgroupHandle::create(&d.cgroup_cpu_root, &d.container_id)?;
        cgroup::cpu::apply_cpu_limit(&handle, fraction)?;
    }
    if let Some(bytes) = d.limits.memory_bytes {
        let handle = CgroupHandle::create(&d.cgroup_memory_root, &d.container_id)?;
        cgroup::memory::apply_memory_limit(&handle, bytes)?;
    }
    Ok(())
}

fn compose_filesystem(d: &StartupDescriptor) -> Result<()> {
    mount::make_root_private()?;
    overlay::mount_overlay(
        &d.image_content,
        &d.dirs.cow_rw,
        &d.dirs.cow_workdir,
        &d.dirs.rootfs,
    )?;
    mount::mount_system_dirs(&d.dirs.rootfs)?;
    devices::populate_dev(&d.dirs.rootfs.join("dev"))
}

fn exec_command(command: &[String]) -> Result<Infallible> {
    let argv = command
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| FerryError::Precondition {
            message: format!("command contains interior NUL: {e}"),
        })?;
    let program = argv.first().ok_or_else(|| FerryError::Precondition {
        message: "empty command vector".into(),
    })?;
    nix::unistd::execvp(program, &argv).map_err(|e| FerryError::Privilege {
        message: format!("exec {command:?} failed: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use ferry_common::types::{ContainerId, ResourceLimits};
    use ferry_core::filesystem::ContainerDirs;

    use super::*;

    fn descriptor_with_limits(base: &Path, limits: ResourceLimits) -> StartupDescriptor {
        StartupDescriptor {
            container_id: ContainerId::new("busybox_latest_0000"),
            image_content: base.join("contents"),
            dirs: ContainerDirs {
                rootfs: base.join("rootfs"),
                cow_rw: base.join("cow_rw"),
                cow_workdir: base.join("cow_workdir"),
            },
            limits,
            command: vec!["/bin/true".to_string()],
            cgroup_cpu_root: base.join("cgroup/cpu"),
            cgroup_memory_root: base.join("cgroup/memory"),
        }
    }

    #[test]
    fn absent_cpu_limit_creates_no_cpu_group() {
        let dir = tempfile::tempdir().expect("tempdir");
        let d = descriptor_with_limits(
            dir.path(),
            ResourceLimits {
                cpus: None,
                memory_bytes: Some(50 * 1024 * 1024),
            },
        );
        std::fs::create_dir_all(&d.cgroup_memory_root).expect("memory root");

        bind_cgroups(&d).expect("bind");

        // The cpu hierarchy is untouched, not even an empty group.
        assert!(!d.cgroup_cpu_root.exists());
        let group = d.cgroup_memory_root.join(d.container_id.as_str());
        let limit =
            std::fs::read_to_string(group.join("memory.limit_in_bytes")).expect("read limit");
        assert_eq!(limit, "52428800");
    }

    #[test]
    fn absent_memory_limit_creates_no_memory_group() {
        let dir = tempfile::tempdir().expect("tempdir");
        let d = descriptor_with_limits(
            dir.path(),
            ResourceLimits {
                cpus: Some(0.5),
                memory_bytes: None,
            },
        );
        std::fs::create_dir_all(&d.cgroup_cpu_root).expect("cpu root");
        std::fs::write(d.cgroup_cpu_root.join("cpu.cfs_period_us"), "100000")
            .expect("write period");

        bind_cgroups(&d).expect("bind");

        assert!(!d.cgroup_memory_root.exists());
        let group = d.cgroup_cpu_root.join(d.container_id.as_str());
        let quota =
            std::fs::read_to_string(group.join("cpu.cfs_quota_us")).expect("read quota");
        assert_eq!(quota, "50000");
    }

    #[test]
    fn no_limits_leave_cgroup_hierarchy_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let d = descriptor_with_limits(dir.path(), ResourceLimits::unlimited());

        bind_cgroups(&d).expect("bind");

        assert!(!d.cgroup_cpu_root.exists());
        assert!(!d.cgroup_memory_root.exists());
    }

    #[test]
    fn launch_phases_render_for_diagnostics() {
        assert_eq!(LaunchPhase::Namespaced.to_string(), "namespace setup");
        assert_eq!(LaunchPhase::CgroupBound.to_string(), "cgroup binding");
        assert_eq!(LaunchPhase::FsComposed.to_string(), "filesystem composition");
        assert_eq!(LaunchPhase::Rooted.to_string(), "root switch");
    }

    #[test]
    fn exec_rejects_empty_command() {
        assert!(exec_command(&[]).is_err());
    }

    #[test]
    fn exec_rejects_interior_nul() {
        assert!(exec_command(&["/bin/e\0cho".to_string()]).is_err());
    }
}
