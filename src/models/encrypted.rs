//! Encrypted column values
//!
//! An [`EncryptedField`] is what a PII column looks like at rest: the sealed
//! value, the digest of its plaintext and the key version that sealed it.

use serde::{Deserialize, Serialize};

use super::ids::KeyVersion;
use crate::crypto::{decrypt, encrypt, fingerprint, KeyRing, SymmetricKey};
use crate::error::VaultResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedField {
    pub ciphertext: String,
    pub digest: String,
    pub key_version: KeyVersion,
}

impl EncryptedField {
    /// Seal `plaintext` under `key`, recording `version` as its key reference
    pub fn seal(plaintext: &str, version: KeyVersion, key: &SymmetricKey) -> VaultResult<Self> {
        Ok(Self {
            ciphertext: encrypt(plaintext, key)?,
            digest: fingerprint(plaintext),
            key_version: version,
        })
    }

    /// Seal under the ring's current key
    pub fn seal_current(plaintext: &str, ring: &KeyRing) -> VaultResult<Self> {
        let (version, key) = ring.get_current()?;
        Self::seal(plaintext, version, key)
    }

    /// Open using the key named by `key_version`
    pub fn open(&self, ring: &KeyRing) -> VaultResult<String> {
        let key = ring.get(self.key_version)?;
        decrypt(&self.ciphertext, &self.digest, key)
    }
}
