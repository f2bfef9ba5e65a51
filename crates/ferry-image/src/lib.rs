//! # ferry-image
//!
//! Image acquisition pipeline for the Ferry engine.
//!
//! Handles:
//! - **Registry**: bearer-token auth, manifest fetch, and layer blob
//!   streaming against the Docker Registry API v2 (schema 1 subset).
//! - **Store**: on-disk layout of manifests, raw layer archives, and the
//!   shared extracted content tree.
//! - **Hashing**: SHA-256 verification of downloaded layers.
//! - **Pull**: the sequential fetch → persist → verify → extract pipeline.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod hash;
pub mod manifest;
pub mod pull;
pub mod registry;
pub mod store;

pub use manifest::ImageManifest;
pub use pull::{ImagePuller, PulledImage};
pub use registry::RegistryClient;
pub use store::LayerStore;
