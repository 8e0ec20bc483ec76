//! Plaintext fingerprints
//!
//! Lowercase hex SHA-256 of a value's plaintext. Used for the integrity check
//! on decrypt and for uniqueness indexes over encrypted columns.

use sha2::{Digest, Sha256};

/// SHA-256 of `plaintext` as 64 lowercase hex characters
pub fn fingerprint(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}
