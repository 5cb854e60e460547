//! # Digests — Content Digests and Version Identifiers
//!
//! Two digest paths exist:
//!
//! - [`sha256_digest()`] over `CanonicalBytes`, for structured values.
//! - [`version_id()`] over the opaque bytes of the transaction that enacted a
//!   mutation. Documents and credentials record it as `VersionId` in their
//!   metadata, so any version can be traced back to the transaction that
//!   produced it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A SHA-256 digest of canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}

/// Compute a SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Version identifier for a mutation: lowercase hex SHA-256 of the raw
/// transaction bytes.
pub fn version_id(tx_bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(tx_bytes))
}
