//! AES-256-GCM envelope cipher
//!
//! A sealed value is `base64(nonce ‖ ciphertext ‖ tag)` with a fresh 96-bit
//! nonce drawn from the OS RNG on every call. Opening a value also checks the
//! recovered plaintext against its stored SHA-256 digest.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use super::digest::fingerprint;
use super::key::SymmetricKey;
use crate::error::{VaultError, VaultResult};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

fn cipher_for(key: &SymmetricKey) -> VaultResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(format!("Failed to create cipher: {}", e)))
}

/// Seal `plaintext` under `key`
pub fn encrypt(plaintext: &str, key: &SymmetricKey) -> VaultResult<String> {
    let cipher = cipher_for(key)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let sealed = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|e| VaultError::Encryption(format!("Encryption failed: {}", e)))?;

    let mut framed = Vec::with_capacity(NONCE_SIZE + sealed.len());
    framed.extend_from_slice(&nonce_bytes);
    framed.extend_from_slice(&sealed);

    Ok(STANDARD.encode(framed))
}

/// Open a sealed value and verify it against `expected_digest`.
///
/// # Errors
///
/// - `MalformedCiphertext` if the value is not base64 or is shorter than a nonce
/// - `AuthenticationFailed` if the key is wrong or the bytes were altered
/// - `DigestMismatch` if the plaintext does not hash to `expected_digest`
pub fn decrypt(ciphertext: &str, expected_digest: &str, key: &SymmetricKey) -> VaultResult<String> {
    let framed = STANDARD
        .decode(ciphertext)
        .map_err(|e| VaultError::MalformedCiphertext(format!("invalid encoding: {}", e)))?;

    if framed.len() < NONCE_SIZE {
        return Err(VaultError::MalformedCiphertext(format!(
            "expected at least {} bytes, got {}",
            NONCE_SIZE,
            framed.len()
        )));
    }

    let (nonce_bytes, sealed) = framed.split_at(NONCE_SIZE);
    let cipher = cipher_for(key)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), sealed)
        .map_err(|_| VaultError::AuthenticationFailed)?;

    let plaintext = String::from_utf8(plaintext)
        .map_err(|e| VaultError::Encryption(format!("Invalid UTF-8 in decrypted data: {}", e)))?;

    if fingerprint(&plaintext) != expected_digest {
        return Err(VaultError::DigestMismatch);
    }

    Ok(plaintext)
}
