//! JSON Export functionality
//!
//! Exports the audit trail to JSON format with schema versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::audit::AuditRecord;
use crate::error::{VaultError, VaultResult};
use crate::services::AuditService;
use crate::storage::{AuditFilter, Storage};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Audit trail export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Exported records, in insertion order
    pub records: Vec<AuditRecord>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub record_count: usize,
    pub first_insert_order: Option<i64>,
    pub last_insert_order: Option<i64>,
}

impl AuditExport {
    /// Build an export from storage
    pub fn from_storage(storage: &Storage, filter: &AuditFilter) -> VaultResult<Self> {
        let records = AuditService::new(storage).list(filter)?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<AuditRecord>) -> Self {
        let metadata = ExportMetadata {
            record_count: records.len(),
            first_insert_order: records.first().map(|r| r.insert_order),
            last_insert_order: records.last().map(|r| r.insert_order),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            records,
            metadata,
        }
    }
}

/// Export the audit trail to JSON
pub fn export_audit_json<W: Write>(
    storage: &Storage,
    filter: &AuditFilter,
    writer: &mut W,
    pretty: bool,
) -> VaultResult<()> {
    let export = AuditExport::from_storage(storage, filter)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| VaultError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::seeded_storage;

    #[test]
    fn test_json_export() {
        let storage = seeded_storage();
        let mut output = Vec::new();
        export_audit_json(&storage, &AuditFilter::default(), &mut output, true).unwrap();

        let parsed: AuditExport = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(parsed.metadata.record_count, 2);
        assert_eq!(parsed.records[0].audit_column, "status");
        assert!(parsed.metadata.first_insert_order < parsed.metadata.last_insert_order);
    }

    #[test]
    fn test_empty_export() {
        let export = AuditExport::from_records(Vec::new());
        assert_eq!(export.metadata.record_count, 0);
        assert!(export.metadata.first_insert_order.is_none());
    }
}
