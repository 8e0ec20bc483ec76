//! Insertion sequence allocation
//!
//! Orgs and users draw from one shared entity sequence; audit records have
//! their own. Each allocation is `max(high-water mark, persisted max) + 1`,
//! where the persisted max covers both committed rows and the `sequences`
//! table. The in-process high-water mark is never rolled back, and after a
//! rollback it is written to `sequences` outside the aborted transaction, so
//! a burned number is not handed out again, even by a later process.

use rusqlite::{params, Connection};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use crate::error::VaultResult;

const ENTITY: &str = "entity";
const AUDIT: &str = "audit";

#[derive(Debug, Default)]
pub struct Sequences {
    entities: AtomicI64,
    audit: AtomicI64,
    /// Numbers were allocated that no committed row accounts for yet
    dirty: AtomicBool,
}

impl Sequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next insertion order for an org or user row
    pub fn next_entity(&self, conn: &Connection) -> VaultResult<i64> {
        let persisted: i64 = conn.query_row(
            "SELECT MAX(
                (SELECT COALESCE(MAX(insert_order), 0) FROM orgs),
                (SELECT COALESCE(MAX(insert_order), 0) FROM users),
                (SELECT COALESCE(MAX(value), 0) FROM sequences WHERE name = ?)
            )",
            [ENTITY],
            |row| row.get(0),
        )?;
        Ok(self.advance(&self.entities, persisted))
    }

    /// Next insertion order for an audit row
    pub fn next_audit(&self, conn: &Connection) -> VaultResult<i64> {
        let persisted: i64 = conn.query_row(
            "SELECT MAX(
                (SELECT COALESCE(MAX(insert_order), 0) FROM audit),
                (SELECT COALESCE(MAX(value), 0) FROM sequences WHERE name = ?)
            )",
            [AUDIT],
            |row| row.get(0),
        )?;
        Ok(self.advance(&self.audit, persisted))
    }

    /// Every allocated number now belongs to a committed row
    pub(crate) fn mark_committed(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    /// Record the high-water marks so numbers burned by an aborted
    /// transaction stay burned. Must run outside any open transaction.
    pub(crate) fn persist(&self, conn: &Connection) -> VaultResult<()> {
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let result = [
            (ENTITY, self.entities.load(Ordering::SeqCst)),
            (AUDIT, self.audit.load(Ordering::SeqCst)),
        ]
        .into_iter()
        .try_for_each(|(name, value)| {
            conn.execute(
                "INSERT INTO sequences (name, value) VALUES (?1, ?2)
                 ON CONFLICT(name) DO UPDATE SET value = MAX(value, excluded.value)",
                params![name, value],
            )
            .map(|_| ())
        });

        if result.is_err() {
            self.dirty.store(true, Ordering::SeqCst);
        }
        Ok(result?)
    }

    fn advance(&self, high_water: &AtomicI64, persisted: i64) -> i64 {
        self.dirty.store(true, Ordering::SeqCst);
        advance(high_water, persisted)
    }
}

fn advance(high_water: &AtomicI64, persisted: i64) -> i64 {
    let previous = match high_water.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
        Some(current.max(persisted) + 1)
    }) {
        Ok(previous) | Err(previous) => previous,
    };
    previous.max(persisted) + 1
}
