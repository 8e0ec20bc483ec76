//! Audit trail display formatting

use super::format_timestamp;
use crate::audit::{format_value, AuditRecord};

/// Format audit records as a table, oldest first
pub fn format_audit_list(records: &[AuditRecord]) -> String {
    if records.is_empty() {
        return "No audit records found.".to_string();
    }

    let column_width = records
        .iter()
        .map(|r| r.audit_column.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:>6}  {:<19}  {:<5}  {:<8}  {:<column_width$}  {:<22}  {:<22}  {}\n",
        "#",
        "When",
        "Table",
        "Entity",
        "Column",
        "Old",
        "New",
        "Signature",
        column_width = column_width,
    ));
    output.push_str(&format!(
        "{:->6}  {:-<19}  {:-<5}  {:-<8}  {:-<column_width$}  {:-<22}  {:-<22}  {:-<12}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        column_width = column_width,
    ));

    for record in records {
        let entity: String = record.audit_id.chars().take(8).collect();
        output.push_str(&format!(
            "{:>6}  {:<19}  {:<5}  {:<8}  {:<column_width$}  {:<22}  {:<22}  {}\n",
            record.insert_order,
            format_timestamp(record.ctime),
            record.audit_table.to_string(),
            entity,
            record.audit_column,
            format_value(&record.details.old),
            format_value(&record.details.new),
            record.new_signature.short(),
            column_width = column_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditDetails, AuditTable};
    use crate::models::Signature;
    use serde_json::json;

    #[test]
    fn test_audit_table_rows() {
        let record = AuditRecord {
            audit_table: AuditTable::Orgs,
            audit_id: "0d3c1f9e-1111-2222-3333-444455556666".into(),
            audit_column: "status".into(),
            old_mtime: 10,
            new_mtime: 20,
            old_signature: Signature::new(),
            new_signature: Signature::new(),
            details: AuditDetails {
                old: json!(1),
                new: json!(2),
            },
            insert_order: 7,
            ctime: 20,
        };

        let output = format_audit_list(&[record]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("orgs"));
        assert!(lines[2].contains("0d3c1f9e"));
        assert!(lines[2].contains("status"));
    }
}
