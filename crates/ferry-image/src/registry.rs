//! Registry client for the Docker Registry API v2 (schema 1 subset).
//!
//! Resolves an image/tag to a scoped bearer token, then to a manifest and
//! a sequence of layer byte streams. Tokens are requested per call and
//! never cached. Layer streams are finite and not resumable; a failed
//! stream is restarted from the beginning and the partial file overwritten.

use std::io::Read;

use ferry_common::constants::REGISTRY_SERVICE;
use ferry_common::error::{FerryError, Result};
use ferry_common::types::LayerDigest;
use serde::Deserialize;

use crate::manifest::ImageManifest;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

/// Blocking HTTP client for one registry endpoint pair.
#[derive(Debug)]
pub struct RegistryClient {
    http: reqwest::blocking::Client,
    registry_base: String,
    auth_base: String,
    namespace: String,
}

impl RegistryClient {
    /// Creates a client for the given registry and token-service bases.
    ///
    /// `registry_base` includes the `/v2` prefix. Bare image names are
    /// qualified with `namespace` (`busybox` → `library/busybox`).
    #[must_use]
    pub fn new(
        registry_base: impl Into<String>,
        auth_base: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            registry_base: registry_base.into(),
            auth_base: auth_base.into(),
            namespace: namespace.into(),
        }
    }

    /// Returns the namespace-qualified repository name for an image.
    #[must_use]
    pub fn repository(&self, image: &str) -> String {
        format!("{}/{image}", self.namespace)
    }

    /// Requests a pull-scoped bearer token for the image.
    ///
    /// Re-executed per call, never cached.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::Network` on a non-success status or an
    /// unparseable token response.
    pub fn authenticate(&self, image: &str) -> Result<String> {
        let url = format!(
            "{}/token?service={REGISTRY_SERVICE}&scope=repository:{}:pull",
            self.auth_base,
            self.repository(image),
        );
        tracing::debug!(image, "requesting pull token");
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| FerryError::Network {
                message: format!("token request failed: {e}"),
            })?;
        if !response.status().is_success() {
            return Err(FerryError::Network {
                message: format!("token request returned {}", response.status()),
            });
        }
        let body: TokenResponse = response.json().map_err(|e| FerryError::Network {
            message: format!("malformed token response: {e}"),
        })?;
        Ok(body.token)
    }

    /// Fetches and parses the manifest for `image:tag`.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::Network` on a non-success status or malformed
    /// manifest JSON.
    pub fn fetch_manifest(&self, image: &str, tag: &str) -> Result<ImageManifest> {
        let token = self.authenticate(image)?;
        let url = format!(
            "{}/{}/manifests/{tag}",
            self.registry_base,
            self.repository(image),
        );
        tracing::info!(image, tag, "fetching manifest");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .map_err(|e| FerryError::Network {
                message: format!("manifest request failed: {e}"),
            })?;
        if !response.status().is_success() {
            return Err(FerryError::Network {
                message: format!("manifest request returned {}", response.status()),
            });
        }
        let body = response.text().map_err(|e| FerryError::Network {
            message: format!("manifest read failed: {e}"),
        })?;
        ImageManifest::from_json(&body)
    }

    /// Opens a lazy byte stream over one layer blob.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::Network` on a non-success status.
    pub fn fetch_layer(&self, image: &str, digest: &LayerDigest) -> Result<impl Read + use<>> {
        let token = self.authenticate(image)?;
        let url = format!(
            "{}/{}/blobs/{digest}",
            self.registry_base,
            self.repository(image),
        );
        tracing::info!(%digest, "fetching layer");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .map_err(|e| FerryError::Network {
                message: format!("layer request failed: {e}"),
            })?;
        if !response.status().is_success() {
            return Err(FerryError::Network {
                message: format!("layer request for {digest} returned {}", response.status()),
            });
        }
        Ok(response)
    }
}
