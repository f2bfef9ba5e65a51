//! # ferry-runtime
//!
//! Container launch engine for Ferry.
//!
//! Handles:
//! - **Descriptor**: the serialized startup state handed to the child.
//! - **Launcher**: the INIT → NAMESPACED → CGROUP_BOUND → FS_COMPOSED →
//!   ROOTED → RUNNING sequence inside the cloned child, and parent-side
//!   supervision.
//! - **Engine**: the `pull` / `run` facade consumed by the CLI.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod descriptor;
pub mod engine;
pub mod launcher;

pub use descriptor::StartupDescriptor;
pub use engine::Engine;
