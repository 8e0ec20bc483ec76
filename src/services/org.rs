//! Org service
//!
//! Creating an org also creates its owner: the owner row is inserted as
//! Unconfirmed, the org row follows, and the owner is then promoted to Active
//! through the regular mutation path, all in one transaction.

use tracing::info;

use super::mutation::{mutate, Mutation};
use crate::audit::AuditTable;
use crate::crypto::KeyRing;
use crate::error::{VaultError, VaultResult};
use crate::models::org::validate_name;
use crate::models::{NewOrg, Org, OrgId, Signature, Status, User, UserId, SCHEMA_VERSION};
use crate::mutator::Mutator;
use crate::storage::{OrgRepository, SignatureRegistry, Storage, Tx, UserRepository};

/// An org together with its owner, as returned by [`OrgService::create`]
#[derive(Debug, Clone)]
pub struct CreatedOrg {
    pub org: Org,
    pub owner: User,
}

/// Service for organization management
pub struct OrgService<'a> {
    storage: &'a Storage,
    keys: &'a KeyRing,
}

impl<'a> OrgService<'a> {
    /// Create a new org service
    pub fn new(storage: &'a Storage, keys: &'a KeyRing) -> Self {
        Self { storage, keys }
    }

    /// Create an org and its owner
    pub fn create(&self, new: NewOrg) -> VaultResult<CreatedOrg> {
        let name = new.name.trim().to_string();
        validate_name(&name)
            .map_err(|e| VaultError::Validation(e.to_string()))?;
        new.owner
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        let created = self.storage.transaction(|tx| {
            let org_id = OrgId::new();
            let owner = self.insert_owner(tx, org_id, &new)?;

            let org = Org {
                id: org_id,
                name: name.clone(),
                owner: owner.id,
                meta: Mutator::initial(
                    tx.next_entity_order()?,
                    new.status,
                    new.role,
                    SCHEMA_VERSION,
                ),
            };
            org.validate()
                .map_err(|e| VaultError::Validation(e.to_string()))?;
            OrgRepository::insert(tx, &org)?;
            SignatureRegistry::register(tx, org.meta.signature, AuditTable::Orgs, org.meta.ctime)?;

            let promoted: Mutation<User> =
                mutate(tx, self.keys, owner.id, owner.meta.signature(), |user: &mut User| {
                    user.meta.status = Status::Active;
                    Ok(())
                })?;

            Ok(CreatedOrg {
                org,
                owner: promoted.record,
            })
        })?;

        info!(
            org = %created.org.id,
            owner = %created.owner.id,
            "created org"
        );
        Ok(created)
    }

    fn insert_owner(&self, tx: &Tx<'_>, org: OrgId, new: &NewOrg) -> VaultResult<User> {
        let owner = &new.owner;
        let user = User::from_parts(
            UserId::new(),
            org,
            owner.display_name.clone(),
            owner.public_key.clone(),
            owner.email.clone(),
            self.keys.current_version(),
            owner.password.clone(),
            Mutator::initial(
                tx.next_entity_order()?,
                Status::Unconfirmed,
                owner.role,
                SCHEMA_VERSION,
            ),
        );
        UserRepository::insert(tx, self.keys, &user)?;
        SignatureRegistry::register(tx, user.meta.signature, AuditTable::Users, user.meta.ctime)?;
        Ok(user)
    }

    /// Get an org by ID
    pub fn get(&self, id: OrgId) -> VaultResult<Option<Org>> {
        self.storage.read(|conn| OrgRepository::get(conn, id))
    }

    /// Get an org by name
    pub fn get_by_name(&self, name: &str) -> VaultResult<Option<Org>> {
        self.storage.read(|conn| OrgRepository::get_by_name(conn, name.trim()))
    }

    /// Find an org by name or ID string
    pub fn find(&self, identifier: &str) -> VaultResult<Option<Org>> {
        if let Some(org) = self.get_by_name(identifier)? {
            return Ok(Some(org));
        }
        if let Ok(id) = identifier.parse::<OrgId>() {
            return self.get(id);
        }
        Ok(None)
    }

    /// All orgs
    pub fn list(&self) -> VaultResult<Vec<Org>> {
        self.storage.read(OrgRepository::list)
    }

    /// Decrypted members of an org
    pub fn members(&self, id: OrgId) -> VaultResult<Vec<User>> {
        self.storage
            .read(|conn| UserRepository::list_by_org(conn, self.keys, id))
    }

    pub fn update_status(
        &self,
        id: OrgId,
        expected: Signature,
        status: Status,
    ) -> VaultResult<Mutation<Org>> {
        self.apply(id, expected, "status", |org| {
            org.meta.status = status;
            Ok(())
        })
    }

    /// Hand the org to another of its members
    pub fn update_owner(
        &self,
        id: OrgId,
        expected: Signature,
        owner: UserId,
    ) -> VaultResult<Mutation<Org>> {
        self.storage.transaction(|tx| {
            match UserRepository::org_of(tx, owner)? {
                Some(org) if org == id => {}
                Some(_) => {
                    return Err(VaultError::Validation(format!(
                        "User {} is not a member of org {}",
                        owner, id
                    )))
                }
                None => return Err(VaultError::user_not_found(owner.to_string())),
            }

            let mutation = mutate(tx, self.keys, id, expected, |org: &mut Org| {
                org.owner = owner;
                Ok(())
            })?;
            info!(org = %id, field = "owner", "updated org");
            Ok(mutation)
        })
    }

    pub fn rename(
        &self,
        id: OrgId,
        expected: Signature,
        name: &str,
    ) -> VaultResult<Mutation<Org>> {
        let name = name.trim().to_string();
        self.apply(id, expected, "name", move |org| {
            validate_name(&name)
                .map_err(|e| VaultError::Validation(e.to_string()))?;
            org.name = name;
            Ok(())
        })
    }

    fn apply(
        &self,
        id: OrgId,
        expected: Signature,
        field: &'static str,
        change: impl FnOnce(&mut Org) -> VaultResult<()>,
    ) -> VaultResult<Mutation<Org>> {
        let mutation = self
            .storage
            .transaction(|tx| mutate(tx, self.keys, id, expected, change))?;
        info!(
            org = %id,
            field,
            audit_records = mutation.audit.len(),
            "updated org"
        );
        Ok(mutation)
    }
}
