//! Audit table access
//!
//! Rows are only ever inserted; there is no update or delete path.

use rusqlite::{params, Connection, Row};

use crate::audit::{AuditDetails, AuditRecord, AuditTable};
use crate::error::{VaultError, VaultResult};

/// Filter for listing audit records
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub table: Option<AuditTable>,
    /// Bare UUID of the audited row
    pub audit_id: Option<String>,
    pub column: Option<String>,
    pub limit: Option<usize>,
}

impl AuditFilter {
    pub fn for_entity(table: AuditTable, audit_id: impl Into<String>) -> Self {
        Self {
            table: Some(table),
            audit_id: Some(audit_id.into()),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

pub struct AuditRepository;

const COLUMNS: &str = "audit_table, audit_id, audit_column, old_mtime, new_mtime, \
                       old_signature, new_signature, details, insert_order, ctime";

impl AuditRepository {
    pub fn insert(conn: &Connection, record: &AuditRecord) -> VaultResult<()> {
        let details = serde_json::to_string(&record.details)?;
        conn.execute(
            &format!("INSERT INTO audit ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)", COLUMNS),
            params![
                record.audit_table,
                record.audit_id,
                record.audit_column,
                record.old_mtime,
                record.new_mtime,
                record.old_signature,
                record.new_signature,
                details,
                record.insert_order,
                record.ctime,
            ],
        )?;
        Ok(())
    }

    /// List records matching `filter`, oldest first
    pub fn list(conn: &Connection, filter: &AuditFilter) -> VaultResult<Vec<AuditRecord>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(table) = filter.table {
            conditions.push("audit_table = ?");
            values.push(Box::new(table));
        }
        if let Some(ref id) = filter.audit_id {
            conditions.push("audit_id = ?");
            values.push(Box::new(id.clone()));
        }
        if let Some(ref column) = filter.column {
            conditions.push("audit_column = ?");
            values.push(Box::new(column.clone()));
        }

        let mut query = format!("SELECT {} FROM audit", COLUMNS);
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY insert_order ASC");

        if let Some(limit) = filter.limit {
            query.push_str(" LIMIT ?");
            values.push(Box::new(limit as i64));
        }

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(values.iter()), Self::raw_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(Self::from_raw(row?)?);
        }
        Ok(records)
    }

    pub fn count(conn: &Connection) -> VaultResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM audit", [], |row| row.get(0))?)
    }

    fn raw_row(row: &Row<'_>) -> rusqlite::Result<(AuditRecord, String)> {
        let details: String = row.get(7)?;
        Ok((
            AuditRecord {
                audit_table: row.get(0)?,
                audit_id: row.get(1)?,
                audit_column: row.get(2)?,
                old_mtime: row.get(3)?,
                new_mtime: row.get(4)?,
                old_signature: row.get(5)?,
                new_signature: row.get(6)?,
                details: AuditDetails {
                    old: serde_json::Value::Null,
                    new: serde_json::Value::Null,
                },
                insert_order: row.get(8)?,
                ctime: row.get(9)?,
            },
            details,
        ))
    }

    fn from_raw((mut record, details): (AuditRecord, String)) -> VaultResult<AuditRecord> {
        record.details = serde_json::from_str(&details).map_err(|e| {
            VaultError::Storage(format!(
                "Invalid audit details at #{}: {}",
                record.insert_order, e
            ))
        })?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Signature;
    use crate::storage::schema;
    use serde_json::json;

    fn record(table: AuditTable, id: &str, order: i64) -> AuditRecord {
        AuditRecord {
            audit_table: table,
            audit_id: id.into(),
            audit_column: "status".into(),
            old_mtime: 1,
            new_mtime: 2,
            old_signature: Signature::new(),
            new_signature: Signature::new(),
            details: AuditDetails {
                old: json!(1),
                new: json!(2),
            },
            insert_order: order,
            ctime: 2,
        }
    }

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_list() {
        let conn = conn();
        let a = record(AuditTable::Orgs, "a", 2);
        let b = record(AuditTable::Users, "b", 1);
        AuditRepository::insert(&conn, &a).unwrap();
        AuditRepository::insert(&conn, &b).unwrap();

        let all = AuditRepository::list(&conn, &AuditFilter::default()).unwrap();
        assert_eq!(all, vec![b.clone(), a.clone()]);

        let orgs = AuditRepository::list(
            &conn,
            &AuditFilter {
                table: Some(AuditTable::Orgs),
                ..AuditFilter::default()
            },
        )
        .unwrap();
        assert_eq!(orgs, vec![a]);
    }

    #[test]
    fn test_filter_by_entity_and_limit() {
        let conn = conn();
        for order in 1..=3 {
            AuditRepository::insert(&conn, &record(AuditTable::Users, "u1", order)).unwrap();
        }
        AuditRepository::insert(&conn, &record(AuditTable::Users, "u2", 4)).unwrap();

        let filter = AuditFilter::for_entity(AuditTable::Users, "u1").with_limit(2);
        let records = AuditRepository::list(&conn, &filter).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].insert_order, 1);
        assert_eq!(AuditRepository::count(&conn).unwrap(), 4);
    }

    #[test]
    fn test_duplicate_insert_order_rejected() {
        let conn = conn();
        AuditRepository::insert(&conn, &record(AuditTable::Orgs, "a", 1)).unwrap();
        let err = AuditRepository::insert(&conn, &record(AuditTable::Orgs, "b", 1)).unwrap_err();
        assert!(err.is_unique_violation());
    }
}
