//! Audit recorder
//!
//! Runs inside the mutation's transaction, after the Mutator has stamped the
//! new state. Each changed watched column becomes one audit row. A failed
//! insert aborts the whole transaction; nothing here retries.

use tracing::debug;

use super::entry::{AuditDetails, AuditRecord};
use super::watch::{WatchColumn, Watched};
use crate::error::VaultResult;
use crate::mutator;
use crate::storage::{AuditRepository, Tx};

pub struct AuditRecorder;

impl AuditRecorder {
    /// Watched columns whose value differs between `before` and `after`
    pub fn changes<W: Watched>(before: &W, after: &W) -> Vec<(W::Column, AuditDetails)> {
        W::Column::ALL
            .iter()
            .filter_map(|&column| {
                let old = before.watched_value(column);
                let new = after.watched_value(column);
                (old != new).then_some((column, AuditDetails { old, new }))
            })
            .collect()
    }

    /// Append one audit row per changed watched column
    pub fn record<W: Watched>(tx: &Tx<'_>, before: &W, after: &W) -> VaultResult<Vec<AuditRecord>> {
        let changes = Self::changes(before, after);
        let ctime = mutator::now();
        let old_meta = before.metadata();
        let new_meta = after.metadata();

        let mut records = Vec::with_capacity(changes.len());
        for (column, details) in changes {
            let record = AuditRecord {
                audit_table: W::TABLE,
                audit_id: after.audit_id(),
                audit_column: column.name().to_string(),
                old_mtime: old_meta.mtime(),
                new_mtime: new_meta.mtime(),
                old_signature: old_meta.signature(),
                new_signature: new_meta.signature(),
                details,
                insert_order: tx.next_audit_order()?,
                ctime,
            };
            AuditRepository::insert(tx, &record)?;
            debug!(
                table = %record.audit_table,
                id = %record.audit_id,
                column = %record.audit_column,
                insert_order = record.insert_order,
                "recorded audit change"
            );
            records.push(record);
        }

        Ok(records)
    }
}
