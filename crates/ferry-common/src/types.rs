//! Domain primitive types used across the Ferry workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a container instance.
///
/// Formatted as `{image}_{tag}_{uuid}`; generated once per run invocation
/// and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Generates a fresh container ID for the given image and tag.
    #[must_use]
    pub fn generate(image: &str, tag: &str) -> Self {
        Self(format!("{image}_{tag}_{}", uuid::Uuid::new_v4()))
    }

    /// Creates a container ID from an existing string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content digest of an image layer, `{algorithm}:{hex}`.
///
/// Digests come from untrusted manifest JSON and are used verbatim as file
/// names, so construction validates the charset: lowercase alphanumerics
/// for the algorithm, lowercase hex for the payload. Anything else (path
/// separators in particular) is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerDigest(String);

impl LayerDigest {
    /// Parses and validates a digest string.
    ///
    /// # Errors
    ///
    /// Returns `FerryError::Precondition` if the value is not of the form
    /// `{algorithm}:{hex}` with the expected charsets.
    pub fn parse(value: impl Into<String>) -> crate::error::Result<Self> {
        let value = value.into();
        let valid = match value.split_once(':') {
            Some((algo, hex)) => {
                !algo.is_empty()
                    && !hex.is_empty()
                    && algo.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
                    && hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
            }
            None => false,
        };
        if !valid {
            return Err(crate::error::FerryError::Precondition {
                message: format!("invalid layer digest: {value}"),
            });
        }
        Ok(Self(value))
    }

    /// Returns the full `{algorithm}:{hex}` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the algorithm component (`sha256`, ...).
    #[must_use]
    pub fn algorithm(&self) -> &str {
        self.0.split_once(':').map_or("", |(a, _)| a)
    }

    /// Returns the hex payload component.
    #[must_use]
    pub fn hex(&self) -> &str {
        self.0.split_once(':').map_or("", |(_, h)| h)
    }
}

impl fmt::Display for LayerDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resource limits for a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// CPU share as a fraction of one core; values above 1.0 permit
    /// bursting across multiple cores.
    pub cpus: Option<f64>,
    /// Memory ceiling in bytes (applied to memory and memory+swap alike).
    pub memory_bytes: Option<u64>,
}

impl ResourceLimits {
    /// Returns limits with no cpu or memory ceiling.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            cpus: None,
            memory_bytes: None,
        }
    }
}

/// Parses a human-readable memory limit into bytes.
///
/// Accepts bare byte counts or binary-unit suffixes `k`, `m`, `g`
/// (case-insensitive): `"100m"` → 104857600.
#[must_use]
pub fn parse_memory_limit(s: &str) -> Option<u64> {
    let s = s.trim();
    let (num_str, multiplier) = match s.chars().last()? {
        'k' | 'K' => (&s[..s.len() - 1], 1024),
        'm' | 'M' => (&s[..s.len() - 1], 1024 * 1024),
        'g' | 'G' => (&s[..s.len() - 1], 1024 * 1024 * 1024),
        _ => (s, 1),
    };
    num_str
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
}
