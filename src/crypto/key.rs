//! 256-bit symmetric key material
//!
//! Key bytes are wiped from memory on drop and never appear in `Debug` output.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};

/// AES-256 key size in bytes
pub const KEY_SIZE: usize = 32;

/// An owned AES-256 key that zeroizes on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
}

impl SymmetricKey {
    /// Copy key material out of a byte slice
    pub fn from_slice(bytes: &[u8]) -> VaultResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(VaultError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }
        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self { bytes: key })
    }

    /// Generate a new random key from the OS RNG
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        Self { bytes: key }
    }

    /// Decode a base64 key as stored in the key file
    pub fn from_base64(encoded: &str) -> VaultResult<Self> {
        let mut raw = STANDARD
            .decode(encoded.trim())
            .map_err(|e| VaultError::Config(format!("Invalid key encoding: {}", e)))?;
        let key = Self::from_slice(&raw);
        raw.zeroize();
        key
    }

    /// Encode for the key file
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.bytes)
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymmetricKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_random() {
        let a = SymmetricKey::generate();
        let b = SymmetricKey::generate();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = SymmetricKey::from_slice(&[0u8; 16]).unwrap_err();
        assert!(matches!(
            err,
            VaultError::InvalidKeyLength {
                expected: 32,
                actual: 16
            }
        ));
    }

    #[test]
    fn test_base64_round_trip() {
        let key = SymmetricKey::generate();
        let decoded = SymmetricKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key.as_bytes(), decoded.as_bytes());
    }

    #[test]
    fn test_debug_redacts() {
        let key = SymmetricKey::from_slice(&[7u8; 32]).unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains('7'));
    }
}
