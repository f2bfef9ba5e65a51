//! Image manifest model (Docker Registry API v2, schema 1 subset).
//!
//! A manifest names an image and lists its layer digests oldest-first.
//! The raw JSON document is retained verbatim so that the persisted copy
//! reflects exactly what the registry served.

use ferry_common::error::{FerryError, Result};
use ferry_common::types::LayerDigest;
use serde::Deserialize;

/// Typed view over the fields the engine consumes.
#[derive(Debug, Deserialize)]
struct ManifestDoc {
    name: String,
    tag: String,
    #[serde(rename = "fsLayers")]
    fs_layers: Vec<FsLayer>,
}

#[derive(Debug, Deserialize)]
struct FsLayer {
    #[serde(rename = "blobSum")]
    blob_sum: String,
}

/// A fetched image manifest.
///
/// Immutable once fetched; re-fetching replaces it wholesale.
#[derive(Debug, Clone)]
pub struct ImageManifest {
    /// Repository name as reported by the registry (`library/busybox`).
    pub name: String,
    /// Tag this manifest was fetched for.
    pub tag: String,
    /// Ordered layer digests, oldest (base) layer first.
    pub layers: Vec<LayerDigest>,
    /// The raw manifest document exactly as served.
    pub raw: serde_json::Value,
}

impl ImageManifest {
    /// Parses a manifest from the raw JSON body served by the registry.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::Network` on malformed JSON or missing fields,
    /// and `FerryError::Precondition` if a layer digest fails validation.
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: serde_json::Value =
            serde_json::from_str(body).map_err(|e| FerryError::Network {
                message: format!("malformed manifest JSON: {e}"),
            })?;
        let doc: ManifestDoc =
            serde_json::from_value(raw.clone()).map_err(|e| FerryError::Network {
                message: format!("manifest missing required fields: {e}"),
            })?;
        let layers = doc
            .fs_layers
            .into_iter()
            .map(|l| LayerDigest::parse(l.blob_sum))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: doc.name,
            tag: doc.tag,
            layers,
            raw,
        })
    }

    /// On-disk slug for this image, `{name}_{tag}` with path separators
    /// flattened (`library/busybox:latest` → `library_busybox_latest`).
    #[must_use]
    pub fn slug(&self) -> String {
        image_slug(&self.name, &self.tag)
    }
}

/// Builds the on-disk slug for an image name and tag.
#[must_use]
pub fn image_slug(name: &str, tag: &str) -> String {
    format!("{}_{tag}", name.replace('/', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> String {
        format!(
            r#"{{
                "schemaVersion": 1,
                "name": "library/busybox",
                "tag": "latest",
                "fsLayers": [
                    {{"blobSum": "sha256:{base}"}},
                    {{"blobSum": "sha256:{top}"}}
                ]
            }}"#,
            base = "aa".repeat(32),
            top = "bb".repeat(32),
        )
    }

    #[test]
    fn parses_layers_in_listed_order() {
        let manifest = ImageManifest::from_json(&sample_json()).expect("parse");
        assert_eq!(manifest.layers.len(), 2);
        assert_eq!(manifest.layers[0].hex(), "aa".repeat(32));
        assert_eq!(manifest.layers[1].hex(), "bb".repeat(32));
    }

    #[test]
    fn retains_raw_document() {
        let manifest = ImageManifest::from_json(&sample_json()).expect("parse");
        assert_eq!(manifest.raw["schemaVersion"], 1);
    }

    #[test]
    fn slug_flattens_name_and_tag() {
        let manifest = ImageManifest::from_json(&sample_json()).expect("parse");
        assert_eq!(manifest.slug(), "library_busybox_latest");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ImageManifest::from_json("{not json").is_err());
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(ImageManifest::from_json(r#"{"name": "x"}"#).is_err());
    }

    #[test]
    fn rejects_invalid_layer_digest() {
        let body = r#"{"name": "a", "tag": "b", "fsLayers": [{"blobSum": "sha256:../../x"}]}"#;
        assert!(ImageManifest::from_json(body).is_err());
    }
}
