//! Unified error types for the Ferry workspace.
//!
//! Pull-time failures (`Network`, `Archive`) abort the whole pull; re-pulling
//! is the recovery mechanism. Run-time failures after the point of no return
//! (`Privilege`) terminate only the container child process.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum FerryError {
    /// Registry authentication, manifest, or blob fetch failed.
    #[error("registry error: {message}")]
    Network {
        /// Description of the failed request.
        message: String,
    },

    /// A layer archive is corrupt or truncated.
    #[error("archive error at {path}: {source}")]
    Archive {
        /// Path of the offending archive.
        path: PathBuf,
        /// Underlying I/O error from the unpacker.
        source: std::io::Error,
    },

    /// A required precondition does not hold (unpulled image, missing
    /// cgroup hierarchy, invalid digest, unsupported host OS).
    #[error("precondition failed: {message}")]
    Precondition {
        /// Description of the violated precondition.
        message: String,
    },

    /// A mount, namespace, or pivot_root operation requiring elevated
    /// capability failed, surfaced directly from the OS call.
    #[error("privileged operation failed: {message}")]
    Privilege {
        /// Description of the failed operation.
        message: String,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A hash validation failed.
    #[error("hash mismatch for {resource}: expected {expected}, got {actual}")]
    HashMismatch {
        /// Resource that failed validation.
        resource: String,
        /// Expected hash value.
        expected: String,
        /// Actual computed hash value.
        actual: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl FerryError {
    /// Wraps an I/O error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, FerryError>;
