//! Error types for orgvault
//!
//! Every fallible operation in the library returns [`VaultResult`]. Crypto and
//! integrity failures are terminal: they are surfaced to the caller untouched
//! and never retried or repaired locally.

use thiserror::Error;

use crate::models::{KeyVersion, Signature};

/// The main error type for orgvault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// Requested key version is not in the key ring
    #[error("Key version not found in key ring: {0}")]
    KeyNotFound(KeyVersion),

    /// Designated current key version is not in the key ring
    #[error("Current key version not found in key ring: {0}")]
    CurrentKeyNotFound(KeyVersion),

    /// Key material is not 256 bits
    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Ciphertext could not be decoded or is too short to hold a nonce
    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    /// AEAD open failed: wrong key or tampered data
    #[error("Authentication failed: wrong key or tampered ciphertext")]
    AuthenticationFailed,

    /// Decrypted plaintext does not hash to the stored digest
    #[error("Decrypted value does not match its stored digest")]
    DigestMismatch,

    /// Store-level unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueConstraintViolation(String),

    /// Caller's expected signature no longer matches the stored record
    #[error("Stale signature for {entity_type} {identifier}: expected {expected}, found {actual}")]
    StaleSignature {
        entity_type: &'static str,
        identifier: String,
        expected: Signature,
        actual: Signature,
    },

    /// Entity not found
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Encryption errors not covered by a more specific variant
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Password hashing errors
    #[error("Password error: {0}")]
    Password(String),
}

impl VaultError {
    /// Create a "not found" error for organizations
    pub fn org_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Org",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an optimistic-concurrency conflict
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleSignature { .. })
    }

    /// Check if this is a unique constraint violation
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueConstraintViolation(_))
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = err {
            let unique = failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY;
            if unique {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                return Self::UniqueConstraintViolation(detail);
            }
        }
        Self::Storage(format!("SQLite error: {}", err))
    }
}

/// Result type alias for orgvault operations
pub type VaultResult<T> = Result<T, VaultError>;
