//! User service
//!
//! Every write goes through the mutation path, which re-seals all PII under
//! the ring's current key. Moving a user to a new key version is therefore a
//! watched change like any other.

use tracing::info;

use super::mutation::{mutate, Mutation};
use crate::audit::AuditTable;
use crate::crypto::{verify_password, KeyRing};
use crate::error::{VaultError, VaultResult};
use crate::models::{NewUser, OrgId, Signature, Status, User, UserId, SCHEMA_VERSION};
use crate::mutator::Mutator;
use crate::storage::{OrgRepository, SignatureRegistry, Storage, UserRepository};

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
    keys: &'a KeyRing,
}

impl<'a> UserService<'a> {
    /// Create a new user service
    pub fn new(storage: &'a Storage, keys: &'a KeyRing) -> Self {
        Self { storage, keys }
    }

    /// Add a user to an existing org
    pub fn create(&self, org: OrgId, new: NewUser) -> VaultResult<User> {
        new.validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        let user = self.storage.transaction(|tx| {
            if OrgRepository::get(tx, org)?.is_none() {
                return Err(VaultError::org_not_found(org.to_string()));
            }

            let user = User::from_parts(
                UserId::new(),
                org,
                new.display_name.clone(),
                new.public_key.clone(),
                new.email.clone(),
                self.keys.current_version(),
                new.password.clone(),
                Mutator::initial(
                    tx.next_entity_order()?,
                    Status::Unconfirmed,
                    new.role,
                    SCHEMA_VERSION,
                ),
            );
            UserRepository::insert(tx, self.keys, &user)?;
            SignatureRegistry::register(
                tx,
                user.meta.signature,
                AuditTable::Users,
                user.meta.ctime,
            )?;
            Ok(user)
        })?;

        info!(user = %user.id, org = %org, "created user");
        Ok(user)
    }

    /// Get and decrypt a user by ID
    pub fn get(&self, id: UserId) -> VaultResult<Option<User>> {
        self.storage
            .read(|conn| UserRepository::get(conn, self.keys, id))
    }

    /// Get a user by ID, failing if absent
    pub fn require(&self, id: UserId) -> VaultResult<User> {
        self.get(id)?
            .ok_or_else(|| VaultError::user_not_found(id.to_string()))
    }

    /// Check a password guess against the stored hash
    pub fn verify_password(&self, id: UserId, guess: &str) -> VaultResult<bool> {
        let user = self.require(id)?;
        verify_password(guess, user.password())
    }

    /// Users still sealed under a non-current key version
    pub fn stale(&self) -> VaultResult<Vec<UserId>> {
        let current = self.keys.current_version();
        self.storage
            .read(|conn| UserRepository::stale_key_versions(conn, current))
    }

    pub fn update_display_name(
        &self,
        id: UserId,
        expected: Signature,
        display_name: &str,
    ) -> VaultResult<Mutation<User>> {
        let display_name = display_name.trim().to_string();
        self.apply(id, expected, "display_name", move |user| {
            user.set_display_name(display_name);
            Ok(())
        })
    }

    pub fn update_public_key(
        &self,
        id: UserId,
        expected: Signature,
        public_key: &str,
    ) -> VaultResult<Mutation<User>> {
        let public_key = public_key.trim().to_string();
        self.apply(id, expected, "public_key", move |user| {
            user.set_public_key(public_key);
            Ok(())
        })
    }

    /// Change the email address. Email is not a watched column.
    pub fn update_email(
        &self,
        id: UserId,
        expected: Signature,
        email: &str,
    ) -> VaultResult<Mutation<User>> {
        let email = email.trim().to_string();
        self.apply(id, expected, "email", move |user| {
            user.set_email(email);
            Ok(())
        })
    }

    /// Replace the password with an already-encoded Argon2id hash
    pub fn update_password(
        &self,
        id: UserId,
        expected: Signature,
        encoded: &str,
    ) -> VaultResult<Mutation<User>> {
        let encoded = encoded.to_string();
        self.apply(id, expected, "password", move |user| {
            user.set_password(encoded);
            Ok(())
        })
    }

    pub fn update_status(
        &self,
        id: UserId,
        expected: Signature,
        status: Status,
    ) -> VaultResult<Mutation<User>> {
        self.apply(id, expected, "status", |user| {
            user.meta.status = status;
            Ok(())
        })
    }

    /// Re-seal a user's PII under the current key without other changes
    pub fn rekey(&self, id: UserId, expected: Signature) -> VaultResult<Mutation<User>> {
        self.apply(id, expected, "key_version", |_| Ok(()))
    }

    fn apply(
        &self,
        id: UserId,
        expected: Signature,
        field: &'static str,
        change: impl FnOnce(&mut User) -> VaultResult<()>,
    ) -> VaultResult<Mutation<User>> {
        let mutation = self.storage.transaction(|tx| {
            mutate(tx, self.keys, id, expected, |user: &mut User| {
                change(user)?;
                user.validate()
                    .map_err(|e| VaultError::Validation(e.to_string()))
            })
        })?;
        info!(
            user = %id,
            field,
            key_version = %mutation.record.key_version().short(),
            audit_records = mutation.audit.len(),
            "updated user"
        );
        Ok(mutation)
    }
}
