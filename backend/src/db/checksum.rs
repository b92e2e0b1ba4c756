//! Fingerprints for secrets that must not leave the server.

use sha2::{Digest, Sha256};

/// Hex characters kept from the digest.
const FINGERPRINT_LEN: usize = 12;

/// SHA-256 of `content` as lowercase hex.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short stable identifier for a Notion API key, shown in place of the key.
pub fn api_key_fingerprint(key: &str) -> String {
    let mut digest = calculate_checksum(key.trim());
    digest.truncate(FINGERPRINT_LEN);
    digest
}
