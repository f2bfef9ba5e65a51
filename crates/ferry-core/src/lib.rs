//! # ferry-core
//!
//! Low-level Linux isolation primitives for the Ferry engine.
//!
//! This crate provides safe abstractions over:
//! - **Namespaces**: PID, UTS, mount, and network isolation via `clone(2)`.
//! - **Cgroups**: cpu and memory resource limiting (v1 controller layout).
//! - **Filesystem**: per-container `OverlayFS` composition, system mounts,
//!   device nodes, and `pivot_root`.
//!
//! Syscall wrappers carry `#[cfg(target_os = "linux")]` implementations
//! with non-Linux stubs that fail cleanly; cgroup code is plain file I/O
//! against configurable controller roots so it stays testable.

pub mod cgroup;
pub mod filesystem;
pub mod namespace;
