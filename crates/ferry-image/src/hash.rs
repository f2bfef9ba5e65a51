//! SHA-256 content verification for downloaded layers.

use std::io::Read;
use std::path::Path;

use ferry_common::error::{FerryError, Result};
use sha2::{Digest, Sha256};

/// Computes the SHA-256 hash of a file, returned as lowercase hex.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path).map_err(|e| FerryError::io(path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| FerryError::io(path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
