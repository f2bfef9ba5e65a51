//! The pull pipeline: manifest fetch, then strictly sequential per-layer
//! fetch → persist → verify → extract.
//!
//! Layers are processed one at a time in manifest order because the
//! last-layer-wins merge into the shared content root requires
//! deterministic ordering; no parallel prefetch is performed. Concurrent
//! pulls of the same image/tag are unsynchronized — callers serialize
//! them externally.

use std::path::PathBuf;

use ferry_common::error::Result;

use crate::registry::RegistryClient;
use crate::store::LayerStore;

/// Result of a completed pull.
#[derive(Debug)]
pub struct PulledImage {
    /// On-disk slug (`library_busybox_latest`).
    pub slug: String,
    /// Number of layers fetched and extracted.
    pub layer_count: usize,
    /// Merged content root shared by all containers of this image.
    pub content_root: PathBuf,
}

/// Orchestrates the image acquisition pipeline.
#[derive(Debug)]
pub struct ImagePuller {
    client: RegistryClient,
    store: LayerStore,
}

impl ImagePuller {
    /// Creates a puller over the given registry client and layer store.
    #[must_use]
    pub const fn new(client: RegistryClient, store: LayerStore) -> Self {
        Self { client, store }
    }

    /// Pulls `image:tag`: fetches and persists the manifest, then each
    /// layer in manifest order (base first).
    ///
    /// Re-pulling an unchanged image is idempotent: the manifest file is
    /// rewritten identically and layers re-extract to the same tree. A
    /// failed pull leaves earlier layers applied; re-running the pull is
    /// the recovery mechanism.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::Network` on any HTTP failure,
    /// `FerryError::HashMismatch` on a corrupted download, and
    /// `FerryError::Archive` on an unpackable layer.
    pub fn pull(&self, image: &str, tag: &str) -> Result<PulledImage> {
        let manifest = self.client.fetch_manifest(image, tag)?;
        let slug = manifest.slug();
        let _ = self.store.persist_manifest(&manifest)?;

        let contents_dir = self.store.contents_dir(&slug);
        for digest in &manifest.layers {
            let stream = self.client.fetch_layer(image, digest)?;
            let archive = self.store.persist_layer(&slug, digest, stream)?;
            self.store.verify_layer(&archive, digest)?;
            self.store.extract_layer(&archive, &contents_dir)?;
        }

        tracing::info!(
            image,
            tag,
            layers = manifest.layers.len(),
            root = %contents_dir.display(),
            "image pulled"
        );
        Ok(PulledImage {
            slug,
            layer_count: manifest.layers.len(),
            content_root: contents_dir,
        })
    }
}
