//! Path management for orgvault
//!
//! ## Path Resolution Order
//!
//! 1. `--data-dir` flag or `ORGVAULT_DATA_DIR` environment variable
//! 2. The platform config directory for `orgvault` (via `directories`)

use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::error::{VaultError, VaultResult};

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "ORGVAULT_DATA_DIR";

/// Manages all paths used by orgvault
#[derive(Debug, Clone)]
pub struct VaultPaths {
    /// Base directory for all orgvault state
    base_dir: PathBuf,
}

impl VaultPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> VaultResult<Self> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Explicit base directory, or the resolved default when `None`
    pub fn resolve(base_dir: Option<PathBuf>) -> VaultResult<Self> {
        match base_dir {
            Some(dir) => Ok(Self::with_base_dir(dir)),
            None => Self::new(),
        }
    }

    /// Create VaultPaths with a custom base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Settings file (config.json)
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Key file (keys.json)
    pub fn keys_file(&self) -> PathBuf {
        self.base_dir.join("keys.json")
    }

    /// SQLite database (vault.db)
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join("vault.db")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> VaultResult<()> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| VaultError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Check if the vault has been initialized (key file exists)
    pub fn is_initialized(&self) -> bool {
        self.keys_file().exists()
    }
}

fn resolve_default_path() -> VaultResult<PathBuf> {
    ProjectDirs::from("", "", "orgvault")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| VaultError::Config("Could not determine a home directory".into()))
}
