//! Registry of every signature ever issued
//!
//! Entity tables only keep the current signature of each row. This table
//! keeps all of them, so a signature can never be issued twice across orgs,
//! users or time.

use rusqlite::{params, Connection, OptionalExtension};

use crate::audit::AuditTable;
use crate::error::VaultResult;
use crate::models::Signature;

pub struct SignatureRegistry;

impl SignatureRegistry {
    /// Record a newly issued signature. Fails with
    /// `UniqueConstraintViolation` if it was seen before.
    pub fn register(
        conn: &Connection,
        signature: Signature,
        source: AuditTable,
        ctime: i64,
    ) -> VaultResult<()> {
        conn.execute(
            "INSERT INTO signatures (signature, source_table, ctime) VALUES (?, ?, ?)",
            params![signature, source, ctime],
        )?;
        Ok(())
    }

    /// Table that issued `signature`, if any
    pub fn source(conn: &Connection, signature: Signature) -> VaultResult<Option<AuditTable>> {
        Ok(conn
            .query_row(
                "SELECT source_table FROM signatures WHERE signature = ?",
                [signature],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn count(conn: &Connection) -> VaultResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM signatures", [], |row| row.get(0))?)
    }
}
