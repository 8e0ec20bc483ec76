//! User model
//!
//! A [`User`] holds its PII in plaintext in memory. The digest of every PII
//! field is kept in step by the setters; storage seals the plaintext under the
//! key ring's current key on every write.

use serde::Serialize;
use std::fmt;

use super::ids::{KeyVersion, OrgId, UserId};
use super::meta::Metadata;
use super::status::Role;
use crate::crypto::fingerprint;

/// A member of an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Owning organization
    pub org: OrgId,

    display_name: String,
    display_name_digest: String,

    /// Base64 Ed25519 public key
    public_key: String,
    public_key_digest: String,

    email: String,
    email_digest: String,

    /// Key version the PII was last sealed under
    pub(crate) key_version: KeyVersion,

    /// Argon2id PHC string
    #[serde(skip_serializing)]
    password: String,

    pub(crate) meta: Metadata,
}

impl User {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: UserId,
        org: OrgId,
        display_name: String,
        public_key: String,
        email: String,
        key_version: KeyVersion,
        password: String,
        meta: Metadata,
    ) -> Self {
        Self {
            id,
            org,
            display_name_digest: fingerprint(&display_name),
            display_name,
            public_key_digest: fingerprint(&public_key),
            public_key,
            email_digest: fingerprint(&email),
            email,
            key_version,
            password,
            meta,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn display_name_digest(&self) -> &str {
        &self.display_name_digest
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn public_key_digest(&self) -> &str {
        &self.public_key_digest
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn email_digest(&self) -> &str {
        &self.email_digest
    }

    pub fn key_version(&self) -> KeyVersion {
        self.key_version
    }

    /// Stored password hash
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
        self.display_name_digest = fingerprint(&self.display_name);
    }

    pub fn set_public_key(&mut self, public_key: impl Into<String>) {
        self.public_key = public_key.into();
        self.public_key_digest = fingerprint(&self.public_key);
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.email_digest = fingerprint(&self.email);
    }

    /// Replace the stored hash with an already-encoded one
    pub fn set_password(&mut self, encoded: impl Into<String>) {
        self.password = encoded.into();
    }

    /// Validate the user
    pub fn validate(&self) -> Result<(), UserValidationError> {
        validate_fields(&self.display_name, &self.public_key, &self.email, &self.password)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.display_name, self.email)
    }
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub display_name: String,
    pub public_key: String,
    pub email: String,
    /// Argon2id PHC string, already hashed
    pub password: String,
    pub role: Role,
}

impl NewUser {
    pub fn new(
        display_name: impl Into<String>,
        public_key: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            public_key: public_key.into(),
            email: email.into(),
            password: password.into(),
            role: Role::Normal,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        validate_fields(&self.display_name, &self.public_key, &self.email, &self.password)
    }
}

fn validate_fields(
    display_name: &str,
    public_key: &str,
    email: &str,
    password: &str,
) -> Result<(), UserValidationError> {
    if display_name.trim().is_empty() {
        return Err(UserValidationError::EmptyDisplayName);
    }
    if public_key.trim().is_empty() {
        return Err(UserValidationError::EmptyPublicKey);
    }
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(UserValidationError::InvalidEmail(email.to_string()));
    }
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }
    Ok(())
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyDisplayName,
    EmptyPublicKey,
    InvalidEmail(String),
    EmptyPassword,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDisplayName => write!(f, "Display name cannot be empty"),
            Self::EmptyPublicKey => write!(f, "Public key cannot be empty"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{}'", email),
            Self::EmptyPassword => write!(f, "Password hash cannot be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Signature, Status};

    fn sample() -> User {
        User::from_parts(
            UserId::new(),
            OrgId::new(),
            "Alice".into(),
            "pk-alice".into(),
            "alice@example.com".into(),
            KeyVersion::new(),
            "$argon2id$stub".into(),
            Metadata {
                ctime: 1,
                mtime: 1,
                insert_order: 1,
                signature: Signature::new(),
                status: Status::Active,
                role: Role::Normal,
                schema_version: 0,
            },
        )
    }

    #[test]
    fn test_digests_follow_setters() {
        let mut user = sample();
        assert_eq!(user.email_digest(), fingerprint("alice@example.com"));

        user.set_email("alice@corp.example");
        assert_eq!(user.email_digest(), fingerprint("alice@corp.example"));

        user.set_display_name("Alice B");
        assert_eq!(user.display_name_digest(), fingerprint("Alice B"));

        user.set_public_key("pk-2");
        assert_eq!(user.public_key_digest(), fingerprint("pk-2"));
    }

    #[test]
    fn test_password_not_serialized() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_validation() {
        let new = NewUser::new("Alice", "pk", "alice@example.com", "$argon2id$x");
        assert!(new.validate().is_ok());

        let bad = NewUser::new("Alice", "pk", "not-an-email", "$argon2id$x");
        assert!(matches!(
            bad.validate(),
            Err(UserValidationError::InvalidEmail(_))
        ));

        let blank = NewUser::new(" ", "pk", "a@b", "$argon2id$x");
        assert_eq!(blank.validate(), Err(UserValidationError::EmptyDisplayName));
    }
}
