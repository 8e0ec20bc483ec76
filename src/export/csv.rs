//! CSV Export functionality
//!
//! One row per audit record. Details are flattened to their JSON text.

use std::io::Write;

use crate::error::{VaultError, VaultResult};
use crate::services::AuditService;
use crate::storage::{AuditFilter, Storage};

const HEADER: [&str; 10] = [
    "insert_order",
    "ctime",
    "audit_table",
    "audit_id",
    "audit_column",
    "old_mtime",
    "new_mtime",
    "old_signature",
    "new_signature",
    "details",
];

/// Export the audit trail to CSV
pub fn export_audit_csv<W: Write>(
    storage: &Storage,
    filter: &AuditFilter,
    writer: &mut W,
) -> VaultResult<()> {
    let records = AuditService::new(storage).list(filter)?;
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(HEADER)
        .map_err(|e| VaultError::Export(e.to_string()))?;

    for record in records {
        let details = serde_json::to_string(&record.details)?;
        out.write_record([
            record.insert_order.to_string(),
            record.ctime.to_string(),
            record.audit_table.to_string(),
            record.audit_id,
            record.audit_column,
            record.old_mtime.to_string(),
            record.new_mtime.to_string(),
            record.old_signature.as_uuid().to_string(),
            record.new_signature.as_uuid().to_string(),
            details,
        ])
        .map_err(|e| VaultError::Export(e.to_string()))?;
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditTable;
    use crate::export::test_support::seeded_storage;

    #[test]
    fn test_export_csv() {
        let storage = seeded_storage();
        let mut output = Vec::new();
        export_audit_csv(&storage, &AuditFilter::default(), &mut output).unwrap();

        let mut reader = csv::Reader::from_reader(output.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), HEADER.len());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][4], "status");
        assert_eq!(&rows[0][9], r#"{"old":1,"new":2}"#);
    }

    #[test]
    fn test_filtered_csv() {
        let storage = seeded_storage();
        let filter = AuditFilter {
            table: Some(AuditTable::Orgs),
            ..AuditFilter::default()
        };
        let mut output = Vec::new();
        export_audit_csv(&storage, &filter, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().contains(",orgs,"));
    }
}
