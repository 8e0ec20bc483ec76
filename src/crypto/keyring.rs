//! Versioned key ring
//!
//! Maps key versions to 256-bit keys and knows which version is current.
//! A ring is immutable after construction; promoting a new current key means
//! building a new ring. Older versions stay in the ring so records written
//! under them can still be decrypted.

use std::collections::HashMap;

use super::key::SymmetricKey;
use crate::error::{VaultError, VaultResult};
use crate::models::KeyVersion;

/// Immutable mapping of key version to key, with one current version
#[derive(Debug, Clone)]
pub struct KeyRing {
    keys: HashMap<KeyVersion, SymmetricKey>,
    current: KeyVersion,
}

impl KeyRing {
    /// Build a ring from the caller's key map.
    ///
    /// Every key is copied into ring-owned storage, so later changes to
    /// `keys` cannot reach the ring.
    ///
    /// # Errors
    ///
    /// - `CurrentKeyNotFound` if `current` is not a key of `keys`
    /// - `InvalidKeyLength` if any key is not 32 bytes
    pub fn new<K: AsRef<[u8]>>(
        keys: &HashMap<KeyVersion, K>,
        current: KeyVersion,
    ) -> VaultResult<Self> {
        if !keys.contains_key(&current) {
            return Err(VaultError::CurrentKeyNotFound(current));
        }

        let mut owned = HashMap::with_capacity(keys.len());
        for (version, key) in keys {
            owned.insert(*version, SymmetricKey::from_slice(key.as_ref())?);
        }

        Ok(Self {
            keys: owned,
            current,
        })
    }

    /// Build a ring from already-owned keys
    pub fn from_keys(
        keys: HashMap<KeyVersion, SymmetricKey>,
        current: KeyVersion,
    ) -> VaultResult<Self> {
        if !keys.contains_key(&current) {
            return Err(VaultError::CurrentKeyNotFound(current));
        }
        Ok(Self { keys, current })
    }

    /// Look up a key by version
    pub fn get(&self, version: KeyVersion) -> VaultResult<&SymmetricKey> {
        self.keys
            .get(&version)
            .ok_or(VaultError::KeyNotFound(version))
    }

    /// Current version and its key
    pub fn get_current(&self) -> VaultResult<(KeyVersion, &SymmetricKey)> {
        // Unreachable after a successful constructor.
        let key = self
            .get(self.current)
            .map_err(|_| VaultError::CurrentKeyNotFound(self.current))?;
        Ok((self.current, key))
    }

    pub fn current_version(&self) -> KeyVersion {
        self.current
    }

    /// All versions in the ring, sorted
    pub fn versions(&self) -> Vec<KeyVersion> {
        let mut versions: Vec<KeyVersion> = self.keys.keys().copied().collect();
        versions.sort();
        versions
    }

    pub fn contains(&self, version: KeyVersion) -> bool {
        self.keys.contains_key(&version)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
