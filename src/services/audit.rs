//! Audit service
//!
//! Read access to the audit trail. There is no write path here;
//! rows are only appended by the mutation function.

use crate::audit::{AuditRecord, AuditTable};
use crate::error::VaultResult;
use crate::models::{OrgId, UserId};
use crate::storage::{AuditFilter, AuditRepository, Storage};

/// Service for reading the audit trail
pub struct AuditService<'a> {
    storage: &'a Storage,
}

impl<'a> AuditService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Records matching `filter`, in insertion order
    pub fn list(&self, filter: &AuditFilter) -> VaultResult<Vec<AuditRecord>> {
        self.storage.read(|conn| AuditRepository::list(conn, filter))
    }

    /// Full trail
    pub fn all(&self) -> VaultResult<Vec<AuditRecord>> {
        self.list(&AuditFilter::default())
    }

    pub fn for_org(&self, id: OrgId) -> VaultResult<Vec<AuditRecord>> {
        self.list(&AuditFilter::for_entity(
            AuditTable::Orgs,
            id.as_uuid().to_string(),
        ))
    }

    pub fn for_user(&self, id: UserId) -> VaultResult<Vec<AuditRecord>> {
        self.list(&AuditFilter::for_entity(
            AuditTable::Users,
            id.as_uuid().to_string(),
        ))
    }

    pub fn count(&self) -> VaultResult<i64> {
        self.storage.read(AuditRepository::count)
    }
}
