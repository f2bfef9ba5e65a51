//! Linux namespace isolation and the namespace-aware spawn primitive.
//!
//! A container child is spawned via `clone(2)` with the configured
//! namespace flags; the child sees itself as PID 1, may change its
//! hostname without affecting the host, gets a private mount table, and
//! starts with a loopback-only network stack (wiring a virtual interface
//! is out of scope).

use ferry_common::error::Result;
use serde::{Deserialize, Serialize};

/// The combination of isolation domains requested for one container.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NamespaceSet {
    /// Isolate the process-id space.
    pub pid: bool,
    /// Isolate hostname and domain name.
    pub uts: bool,
    /// Isolate the mount table.
    pub mount: bool,
    /// Isolate the network stack.
    pub network: bool,
}

impl Default for NamespaceSet {
    fn default() -> Self {
        Self {
            pid: true,
            uts: true,
            mount: true,
            network: true,
        }
    }
}

#[cfg(target_os = "linux")]
impl NamespaceSet {
    fn clone_flags(self) -> nix::sched::CloneFlags {
        use nix::sched::CloneFlags;

        let mut flags = CloneFlags::empty();
        if self.pid {
            flags |= CloneFlags::CLONE_NEWPID;
        }
        if self.uts {
            flags |= CloneFlags::CLONE_NEWUTS;
        }
        if self.mount {
            flags |= CloneFlags::CLONE_NEWNS;
        }
        if self.network {
            flags |= CloneFlags::CLONE_NEWNET;
        }
        flags
    }
}

/// Stack size for the cloned child, before it execs.
#[cfg(target_os = "linux")]
const CHILD_STACK_SIZE: usize = 1024 * 1024;

/// Spawns `child` in fresh namespaces via `clone(2)`.
///
/// The callback's return value becomes the child's exit status; on a
/// successful `execvp` inside the callback there is no return at all.
/// The parent receives the child's pid and is expected to `waitpid` it.
///
/// # Errors
///
/// Returns `FerryError::Privilege` if the `clone(2)` syscall fails.
#[cfg(target_os = "linux")]
pub fn spawn_isolated<F>(set: NamespaceSet, mut child: F) -> Result<nix::unistd::Pid>
where
    F: FnMut() -> isize,
{
    use nix::sched::clone;
    use nix::sys::signal::Signal;

    let mut stack = vec![0u8; CHILD_STACK_SIZE].into_boxed_slice();
    // SAFETY: the child runs entirely on `stack` until it execs or exits;
    // the buffer is leaked below so it outlives the child regardless of
    // when the parent returns.
    let pid = unsafe {
        clone(
            Box::new(&mut child),
            &mut stack,
            set.clone_flags(),
            Some(Signal::SIGCHLD as libc::c_int),
        )
    }
    .map_err(|e| ferry_common::error::FerryError::Privilege {
        message: format!("clone failed: {e}"),
    })?;
    // One clone per run invocation, so the leak is bounded.
    std::mem::forget(stack);
    tracing::info!(pid = pid.as_raw(), "container process spawned");
    Ok(pid)
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — namespace isolation requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn spawn_isolated<F>(_set: NamespaceSet, _child: F) -> Result<nix::unistd::Pid>
where
    F: FnMut() -> isize,
{
    Err(ferry_common::error::FerryError::Precondition {
        message: "Linux is required for container isolation".into(),
    })
}

/// Sets the hostname inside the child's UTS namespace.
///
/// # Errors
///
/// Returns `FerryError::Privilege` if `sethostname(2)` fails.
#[cfg(target_os = "linux")]
pub fn set_hostname(hostname: &str) -> Result<()> {
    nix::unistd::sethostname(hostname).map_err(|e| {
        ferry_common::error::FerryError::Privilege {
            message: format!("sethostname failed: {e}"),
        }
    })?;
    tracing::debug!(hostname, "container hostname set");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — UTS isolation requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn set_hostname(_hostname: &str) -> Result<()> {
    Err(ferry_common::error::FerryError::Precondition {
        message: "Linux is required for container isolation".into(),
    })
}
