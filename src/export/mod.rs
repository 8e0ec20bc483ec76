//! Export module for orgvault
//!
//! Exports the audit trail in multiple formats:
//! - CSV: one row per record (spreadsheet-compatible)
//! - JSON: machine-readable, with schema version and metadata
//! - YAML: human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_audit_csv;
pub use json::{export_audit_json, AuditExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_audit_yaml;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::crypto::{KeyRing, SymmetricKey};
    use crate::models::{KeyVersion, NewOrg, NewUser, Status};
    use crate::services::OrgService;
    use crate::storage::Storage;
    use std::collections::HashMap;

    /// A store with one org whose owner was promoted and whose status was changed
    pub fn seeded_storage() -> Storage {
        let storage = Storage::open_in_memory().unwrap();
        let v1 = KeyVersion::new();
        let keys = KeyRing::from_keys(HashMap::from([(v1, SymmetricKey::generate())]), v1).unwrap();

        let orgs = OrgService::new(&storage, &keys);
        let created = orgs
            .create(NewOrg::new(
                "acme",
                NewUser::new("Owner", "pk-owner", "owner@acme.test", "$argon2id$stub"),
            ))
            .unwrap();
        orgs.update_status(created.org.id, created.org.meta().signature(), Status::Active)
            .unwrap();
        storage
    }
}
