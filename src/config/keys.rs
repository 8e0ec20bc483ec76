//! On-disk key set
//!
//! `keys.json` holds every key version the vault has ever used, base64
//! encoded, plus the version new writes are sealed under. The file is the
//! only place key material lives; it is written with owner-only permissions
//! on Unix.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::OpenOptions;
use std::io::Write;
use tracing::info;

use super::paths::VaultPaths;
use crate::crypto::{KeyRing, SymmetricKey};
use crate::error::{VaultError, VaultResult};
use crate::models::KeyVersion;

/// The key set as stored in keys.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFile {
    /// Version used for new writes
    pub current: KeyVersion,
    /// Every known version, base64 encoded
    pub keys: BTreeMap<KeyVersion, String>,
}

impl KeyFile {
    /// A fresh key set with one random key
    pub fn generate() -> Self {
        let version = KeyVersion::new();
        let mut keys = BTreeMap::new();
        keys.insert(version, SymmetricKey::generate().to_base64());
        Self {
            current: version,
            keys,
        }
    }

    /// Add a new random key and make it current. Old versions are kept.
    pub fn rotate(&mut self) -> KeyVersion {
        let version = KeyVersion::new();
        self.keys
            .insert(version, SymmetricKey::generate().to_base64());
        self.current = version;
        version
    }

    /// Decode every key into a ring
    pub fn to_keyring(&self) -> VaultResult<KeyRing> {
        let mut keys = HashMap::with_capacity(self.keys.len());
        for (version, encoded) in &self.keys {
            keys.insert(*version, SymmetricKey::from_base64(encoded)?);
        }
        KeyRing::from_keys(keys, self.current)
    }

    /// Load keys.json
    pub fn load(paths: &VaultPaths) -> VaultResult<Self> {
        let path = paths.keys_file();
        if !path.exists() {
            return Err(VaultError::Config(format!(
                "No key file at {}. Run `orgvault init` first.",
                path.display()
            )));
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| VaultError::Io(format!("Failed to read key file: {}", e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| VaultError::Config(format!("Failed to parse key file: {}", e)))
    }

    /// Write keys.json
    pub fn save(&self, paths: &VaultPaths) -> VaultResult<()> {
        paths.ensure_directories()?;
        let path = paths.keys_file();

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::Config(format!("Failed to serialize key file: {}", e)))?;
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&path)
            .map_err(|e| VaultError::Io(format!("Failed to open key file: {}", e)))?;

        // The mode above only applies on creation; tighten an existing file too.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| VaultError::Io(format!("Failed to write key file: {}", e)))?;

        info!(current = %self.current.short(), versions = self.keys.len(), "saved key file");
        Ok(())
    }
}
