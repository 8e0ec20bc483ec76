//! Audit record data structures
//!
//! One [`AuditRecord`] describes the change of one watched column in one
//! mutation, linked to the mutation by its old and new signatures.

use chrono::{TimeZone, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Signature;

/// Entity tables that carry an audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditTable {
    Orgs,
    Users,
}

impl AuditTable {
    /// Table name as stored in `audit.audit_table`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Orgs => "orgs",
            Self::Users => "users",
        }
    }

    /// Parse table name from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "orgs" | "org" => Some(Self::Orgs),
            "users" | "user" => Some(Self::Users),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for AuditTable {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AuditTable {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        Self::parse(text).ok_or_else(|| {
            FromSqlError::Other(format!("unknown audit table: {}", text).into())
        })
    }
}

/// Literal old and new values of a changed column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditDetails {
    pub old: Value,
    pub new: Value,
}

/// A single row of the audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Entity table the change happened in
    pub audit_table: AuditTable,

    /// Id of the changed row (bare UUID)
    pub audit_id: String,

    /// Name of the changed column
    pub audit_column: String,

    pub old_mtime: i64,
    pub new_mtime: i64,
    pub old_signature: Signature,
    pub new_signature: Signature,

    pub details: AuditDetails,

    /// Global audit insertion sequence
    pub insert_order: i64,

    /// When the record was written (Unix seconds)
    pub ctime: i64,
}

impl AuditRecord {
    /// Format the record for human-readable output
    pub fn format_human_readable(&self) -> String {
        let when = Utc
            .timestamp_opt(self.ctime, 0)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| self.ctime.to_string());

        format!(
            "[{}] #{} {} {} {}: {} -> {}\n  Signature: {} -> {}",
            when,
            self.insert_order,
            self.audit_table,
            self.audit_id,
            self.audit_column,
            format_value(&self.details.old),
            format_value(&self.details.new),
            self.old_signature.short(),
            self.new_signature.short(),
        )
    }
}

/// Format a JSON value for human-readable display
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            // Digests and hashes are long; the prefix is enough to tell them apart.
            if s.chars().count() > 20 {
                let head: String = s.chars().take(17).collect();
                format!("\"{}...\"", head)
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> AuditRecord {
        AuditRecord {
            audit_table: AuditTable::Orgs,
            audit_id: "c4d98d26-e6d4-4e75-b88b-dfbe8361757a".into(),
            audit_column: "status".into(),
            old_mtime: 1_700_000_000,
            new_mtime: 1_700_000_060,
            old_signature: Signature::new(),
            new_signature: Signature::new(),
            details: AuditDetails {
                old: json!(1),
                new: json!(2),
            },
            insert_order: 3,
            ctime: 1_700_000_060,
        }
    }

    #[test]
    fn test_table_names() {
        assert_eq!(AuditTable::Orgs.to_string(), "orgs");
        assert_eq!(AuditTable::parse("user"), Some(AuditTable::Users));
        assert_eq!(AuditTable::parse("accounts"), None);
    }

    #[test]
    fn test_details_serialize_shape() {
        let record = sample();
        assert_eq!(
            serde_json::to_value(&record.details).unwrap(),
            json!({"old": 1, "new": 2})
        );
    }

    #[test]
    fn test_human_readable() {
        let text = sample().format_human_readable();
        assert!(text.contains("#3 orgs"));
        assert!(text.contains("status: 1 -> 2"));
        assert!(text.contains("sig-"));
    }

    #[test]
    fn test_format_value_truncates() {
        let long = json!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(format_value(&long), "\"ba7816bf8f01cfea4...\"");
        assert_eq!(format_value(&json!("short")), "\"short\"");
    }
}
