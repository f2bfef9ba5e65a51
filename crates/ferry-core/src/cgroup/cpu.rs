//! CPU bandwidth limiting via the cpu controller.
//!
//! The quota is derived from the controller's scheduling period:
//! `quota = period × fraction`. A fraction at or below 1.0 caps the
//! container to that share of one core; above 1.0 permits bursting
//! across multiple cores.

use ferry_common::error::{FerryError, Result};

use crate::cgroup::CgroupHandle;

/// Applies a cpu share fraction to the group.
///
/// Reads `cpu.cfs_period_us` from the controller root and writes
/// `cpu.cfs_quota_us` in the group.
///
/// # Errors
///
/// Returns an error if the period cannot be read or parsed, or if the
/// quota cannot be written — fatal to container startup in either case.
pub fn apply_cpu_limit(cgroup: &CgroupHandle, fraction: f64) -> Result<()> {
    let period_raw = cgroup.read_root_control("cpu.cfs_period_us")?;
    let period: u64 = period_raw
        .trim()
        .parse()
        .map_err(|e| FerryError::Precondition {
            message: format!("unparseable cpu period {period_raw:?}: {e}"),
        })?;

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let quota = (period as f64 * fraction) as u64;
    cgroup.write_control("cpu.cfs_quota_us", &quota.to_string())?;
    tracing::info!(period, quota, fraction, "cpu limit applied");
    Ok(())
}
