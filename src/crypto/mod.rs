//! Cryptographic functions for orgvault
//!
//! Versioned AES-256-GCM envelope encryption for PII columns, SHA-256
//! plaintext fingerprints and Argon2id password hashing.

pub mod digest;
pub mod encryption;
pub mod key;
pub mod keyring;
pub mod password;

pub use digest::fingerprint;
pub use encryption::{decrypt, encrypt};
pub use key::SymmetricKey;
pub use keyring::KeyRing;
pub use password::{hash_password, verify_password, PasswordParams};
