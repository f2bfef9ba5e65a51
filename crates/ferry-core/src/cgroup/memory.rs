//! Memory limiting via the memory controller.

use ferry_common::error::Result;

use crate::cgroup::CgroupHandle;

/// Applies a hard memory ceiling to the group.
///
/// The identical byte value goes to both `memory.limit_in_bytes` and
/// `memory.memsw.limit_in_bytes`, disabling swap so the kernel OOM-kills
/// rather than thrashes.
///
/// # Errors
///
/// Returns an error if either limit file cannot be written — fatal to
/// container startup.
pub fn apply_memory_limit(cgroup: &CgroupHandle, bytes: u64) -> Result<()> {
    let value = bytes.to_string();
    cgroup.write_control("memory.limit_in_bytes", &value)?;
    cgroup.write_control("memory.memsw.limit_in_bytes", &value)?;
    tracing::info!(bytes, "memory limit applied");
    Ok(())
}
