//! On-disk layer store.
//!
//! Layout under the images root:
//!
//! ```text
//! <imagesRoot>/<name>_<tag>.json              pretty-printed manifest copy
//! <imagesRoot>/<name>_<tag>/layers/<digest>.tar   raw per-layer archives
//! <imagesRoot>/<name>_<tag>/layers/contents/      merged extracted tree,
//!                                                 shared by all containers
//! ```
//!
//! Layers are extracted strictly in manifest order; overlapping paths
//! resolve last-layer-wins into the single shared content root.

use std::io::Read;
use std::path::{Path, PathBuf};

use ferry_common::error::{FerryError, Result};
use ferry_common::types::LayerDigest;

use crate::manifest::ImageManifest;

/// Manages persisted manifests, layer archives, and extracted content.
#[derive(Debug, Clone)]
pub struct LayerStore {
    images_root: PathBuf,
}

impl LayerStore {
    /// Creates a store rooted at the given images directory.
    #[must_use]
    pub fn new(images_root: impl Into<PathBuf>) -> Self {
        Self {
            images_root: images_root.into(),
        }
    }

    /// Returns the manifest file path for an image slug.
    #[must_use]
    pub fn manifest_path(&self, slug: &str) -> PathBuf {
        self.images_root.join(format!("{slug}.json"))
    }

    /// Returns the directory holding raw layer archives for an image slug.
    #[must_use]
    pub fn layers_dir(&self, slug: &str) -> PathBuf {
        self.images_root.join(slug).join("layers")
    }

    /// Returns the shared extracted content root for an image slug.
    #[must_use]
    pub fn contents_dir(&self, slug: &str) -> PathBuf {
        self.layers_dir(slug).join("contents")
    }

    /// Writes the manifest as pretty-printed, key-sorted JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the images root cannot be created or the file
    /// cannot be written.
    pub fn persist_manifest(&self, manifest: &ImageManifest) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.images_root)
            .map_err(|e| FerryError::io(&self.images_root, e))?;
        let path = self.manifest_path(&manifest.slug());
        // serde_json::Value maps are BTreeMap-backed, so keys serialize sorted.
        let json = serde_json::to_string_pretty(&manifest.raw)?;
        std::fs::write(&path, json).map_err(|e| FerryError::io(&path, e))?;
        tracing::info!(path = %path.display(), "manifest persisted");
        Ok(path)
    }

    /// Streams one layer blob to `<slug>/layers/<digest>.tar`.
    ///
    /// Any partial file from a prior failed attempt is truncated, never
    /// appended to; layer streams are restarted from the beginning.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer directory cannot be created or the
    /// stream cannot be copied to disk.
    pub fn persist_layer(
        &self,
        slug: &str,
        digest: &LayerDigest,
        mut stream: impl Read,
    ) -> Result<PathBuf> {
        let layers_dir = self.layers_dir(slug);
        std::fs::create_dir_all(&layers_dir).map_err(|e| FerryError::io(&layers_dir, e))?;
        let path = layers_dir.join(format!("{digest}.tar"));
        let mut file = std::fs::File::create(&path).map_err(|e| FerryError::io(&path, e))?;
        let written =
            std::io::copy(&mut stream, &mut file).map_err(|e| FerryError::io(&path, e))?;
        tracing::info!(%digest, bytes = written, "layer persisted");
        Ok(path)
    }

    /// Verifies a persisted layer archive against its content digest.
    ///
    /// Only `sha256` digests are checked; other algorithms are skipped.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::HashMismatch` if the file content does not
    /// hash to the expected digest.
    pub fn verify_layer(&self, path: &Path, digest: &LayerDigest) -> Result<()> {
        if digest.algorithm() != "sha256" {
            tracing::debug!(%digest, "skipping verification for non-sha256 digest");
            return Ok(());
        }
        let actual = crate::hash::hash_file(path)?;
        if actual != digest.hex() {
            return Err(FerryError::HashMismatch {
                resource: path.display().to_string(),
                expected: digest.hex().to_string(),
                actual,
            });
        }
        Ok(())
    }

    /// Unpacks one layer archive into the shared content root.
    ///
    /// Gzip-compressed archives are detected by their magic bytes and
    /// decompressed transparently. Extraction of one layer is
    /// all-or-nothing; extraction across layers is not transactional —
    /// an interruption leaves earlier layers applied, and re-running the
    /// pull re-extracts idempotently.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::Archive` on a corrupt or truncated archive.
    pub fn extract_layer(&self, archive_path: &Path, contents_dir: &Path) -> Result<()> {
        tracing::info!(
            archive = %archive_path.display(),
            target = %contents_dir.display(),
            "extracting layer"
        );
        std::fs::create_dir_all(contents_dir).map_err(|e| FerryError::io(contents_dir, e))?;

        let file = std::fs::File::open(archive_path).map_err(|e| FerryError::io(archive_path, e))?;
        let archive_err = |e| FerryError::Archive {
            path: archive_path.to_path_buf(),
            source: e,
        };
        if is_gzip(archive_path)? {
            let decoder = flate2::read::GzDecoder::new(file);
            let mut archive = tar::Archive::new(decoder);
            archive.unpack(contents_dir).map_err(archive_err)?;
        } else {
            let mut archive = tar::Archive::new(file);
            archive.unpack(contents_dir).map_err(archive_err)?;
        }
        Ok(())
    }
}

/// Detects gzip compression by the two-byte magic header.
fn is_gzip(path: &Path) -> Result<bool> {
    let mut file = std::fs::File::open(path).map_err(|e| FerryError::io(path, e))?;
    let mut magic = [0u8; 2];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == [0x1f, 0x8b]),
        // Shorter than two bytes cannot be gzip.
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(FerryError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ImageManifest;

    fn digest_for(byte: &str) -> LayerDigest {
        LayerDigest::parse(format!("sha256:{}", byte.repeat(32))).expect("digest")
    }

    fn tar_with_file(name: &str, data: &[u8]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data).expect("append");
        builder.into_inner().expect("finish tar")
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        use std::io::Write;
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).expect("gzip write");
        encoder.finish().expect("gzip finish")
    }

    #[test]
    fn persist_layer_overwrites_partial_previous_attempt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LayerStore::new(dir.path());
        let digest = digest_for("aa");

        let path = store
            .persist_layer("img", &digest, &b"partial half-written junk"[..])
            .expect("persist");
        let path2 = store
            .persist_layer("img", &digest, &b"full"[..])
            .expect("persist again");

        assert_eq!(path, path2);
        assert_eq!(std::fs::read(&path).expect("read"), b"full");
    }

    #[test]
    fn persist_layer_names_file_by_digest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LayerStore::new(dir.path());
        let digest = digest_for("ab");
        let path = store
            .persist_layer("img", &digest, &b"x"[..])
            .expect("persist");
        assert!(path.ends_with(format!("img/layers/{digest}.tar")));
    }

    #[test]
    fn extract_plain_tar_creates_expected_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LayerStore::new(dir.path());
        let archive = dir.path().join("layer.tar");
        std::fs::write(&archive, tar_with_file("hello.txt", b"hello")).expect("write");

        let contents = dir.path().join("contents");
        store.extract_layer(&archive, &contents).expect("extract");
        assert_eq!(
            std::fs::read_to_string(contents.join("hello.txt")).expect("read"),
            "hello"
        );
    }

    #[test]
    fn extract_gzipped_tar_detected_by_magic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LayerStore::new(dir.path());
        // Named .tar like a persisted layer, but gzip-compressed inside.
        let archive = dir.path().join("layer.tar");
        std::fs::write(&archive, gzip(&tar_with_file("gz.txt", b"zipped"))).expect("write");

        let contents = dir.path().join("contents");
        store.extract_layer(&archive, &contents).expect("extract");
        assert_eq!(
            std::fs::read_to_string(contents.join("gz.txt")).expect("read"),
            "zipped"
        );
    }

    #[test]
    fn extract_corrupt_archive_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LayerStore::new(dir.path());
        let archive = dir.path().join("bad.tar");
        std::fs::write(&archive, vec![0xffu8; 700]).expect("write");
        assert!(store.extract_layer(&archive, &dir.path().join("out")).is_err());
    }

    #[test]
    fn later_layer_wins_on_overlapping_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LayerStore::new(dir.path());
        let contents = dir.path().join("contents");

        let base = dir.path().join("base.tar");
        let top = dir.path().join("top.tar");
        std::fs::write(&base, tar_with_file("etc/version", b"base")).expect("write");
        std::fs::write(&top, tar_with_file("etc/version", b"top")).expect("write");

        store.extract_layer(&base, &contents).expect("extract base");
        store.extract_layer(&top, &contents).expect("extract top");
        assert_eq!(
            std::fs::read_to_string(contents.join("etc/version")).expect("read"),
            "top"
        );
    }

    #[test]
    fn verify_layer_accepts_matching_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LayerStore::new(dir.path());
        let path = dir.path().join("layer.tar");
        std::fs::write(&path, b"abc").expect("write");
        let digest = LayerDigest::parse(
            "sha256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        )
        .expect("digest");
        store.verify_layer(&path, &digest).expect("verify");
    }

    #[test]
    fn verify_layer_rejects_mismatched_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LayerStore::new(dir.path());
        let path = dir.path().join("layer.tar");
        std::fs::write(&path, b"tampered").expect("write");
        let digest = digest_for("aa");
        assert!(matches!(
            store.verify_layer(&path, &digest),
            Err(ferry_common::error::FerryError::HashMismatch { .. })
        ));
    }

    #[test]
    fn persist_manifest_writes_sorted_pretty_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LayerStore::new(dir.path());
        let manifest = ImageManifest::from_json(&format!(
            r#"{{"tag": "latest", "name": "library/busybox", "schemaVersion": 1,
                "fsLayers": [{{"blobSum": "sha256:{}"}}]}}"#,
            "aa".repeat(32)
        ))
        .expect("parse");

        let path = store.persist_manifest(&manifest).expect("persist");
        assert!(path.ends_with("library_busybox_latest.json"));

        let written = std::fs::read_to_string(&path).expect("read");
        let fs_layers = written.find("\"fsLayers\"").expect("fsLayers present");
        let name = written.find("\"name\"").expect("name present");
        let schema = written.find("\"schemaVersion\"").expect("schema present");
        let tag = written.find("\"tag\"").expect("tag present");
        assert!(fs_layers < name && name < schema && schema < tag, "keys sorted");
        assert!(written.contains('\n'), "pretty-printed");
    }
}
