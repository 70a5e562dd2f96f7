//! Project keys namespace the global decisions tier.
//!
//! A key is the first 16 hex characters of the SHA-256 digest of the working
//! directory path exactly as the host reports it. Keys are not a security
//! boundary: a collision only means two projects share a global file.

use std::fmt;

use sha2::{Digest, Sha256};

/// Stable short identifier for a working directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectKey(String);

impl ProjectKey {
    /// Number of hex characters kept from the digest
    pub const LEN: usize = 16;

    /// Derive the key for a working-directory path string
    pub fn from_cwd(cwd: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(cwd.as_bytes());
        let hash = hasher.finalize();
        let full_hex = hex::encode(&hash[..]);
        ProjectKey(full_hex[..Self::LEN].to_string())
    }

    /// Get the key string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
