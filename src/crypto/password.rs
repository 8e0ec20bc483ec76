//! Password hashing using Argon2id
//!
//! Passwords are stored as PHC strings, which carry their own salt and
//! parameters, so verification needs nothing but the stored value.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize};

use crate::error::{VaultError, VaultResult};

/// Cost parameters for new password hashes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordParams {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 2)
    pub time_cost: u32,
    /// Parallelism degree (default: 1)
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl PasswordParams {
    /// Create params with specific values
    pub fn with_values(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    fn hasher(&self) -> VaultResult<Argon2<'static>> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|e| VaultError::Password(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash a password with a fresh random salt
pub fn hash_password(plain: &str, params: &PasswordParams) -> VaultResult<String> {
    if plain.is_empty() {
        return Err(VaultError::Validation("Password cannot be empty".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = params
        .hasher()?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| VaultError::Password(format!("Hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Check `guess` against a stored PHC string
pub fn verify_password(guess: &str, encoded: &str) -> VaultResult<bool> {
    let parsed = PasswordHash::new(encoded)
        .map_err(|e| VaultError::Password(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(guess.as_bytes(), &parsed)
        .is_ok())
}

/// Cheap parameters for tests
#[cfg(test)]
pub(crate) fn test_params() -> PasswordParams {
    PasswordParams::with_values(256, 1, 1)
}
