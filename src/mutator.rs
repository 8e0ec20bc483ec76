//! Metadata stamping for versioned records
//!
//! The [`Mutator`] is the only code that assigns modification times and
//! signatures. It runs inside the transactional update function, after the
//! attribute change and before the row is persisted.

use chrono::Utc;

use crate::models::{Metadata, Role, Signature, Status};

/// Current wall-clock time in Unix seconds
pub fn now() -> i64 {
    Utc::now().timestamp()
}

pub struct Mutator;

impl Mutator {
    /// Metadata for a freshly inserted record
    pub fn initial(insert_order: i64, status: Status, role: Role, schema_version: i64) -> Metadata {
        Self::initial_at(now(), insert_order, status, role, schema_version)
    }

    pub fn initial_at(
        now: i64,
        insert_order: i64,
        status: Status,
        role: Role,
        schema_version: i64,
    ) -> Metadata {
        Metadata {
            ctime: now,
            mtime: now,
            insert_order,
            signature: Signature::new(),
            status,
            role,
            schema_version,
        }
    }

    /// Stamp `after` as the successor of `before`.
    ///
    /// `after.mtime` never goes below `before.mtime`, even if the clock
    /// stepped backwards. The signature is always fresh.
    pub fn stamp(before: &Metadata, after: &mut Metadata) {
        Self::stamp_at(before, after, now());
    }

    pub fn stamp_at(before: &Metadata, after: &mut Metadata, now: i64) {
        after.mtime = now.max(before.mtime);
        after.signature = Signature::new();
        // Identity fields of the envelope are fixed at insert.
        after.ctime = before.ctime;
        after.insert_order = before.insert_order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> Metadata {
        Mutator::initial_at(1_000, 7, Status::Unconfirmed, Role::Normal, 0)
    }

    #[test]
    fn test_initial() {
        let m = meta();
        assert_eq!(m.ctime(), 1_000);
        assert_eq!(m.mtime(), 1_000);
        assert_eq!(m.insert_order(), 7);
        assert_eq!(m.status(), Status::Unconfirmed);
    }

    #[test]
    fn test_stamp_advances() {
        let before = meta();
        let mut after = before.clone();
        after.status = Status::Active;

        Mutator::stamp_at(&before, &mut after, 2_000);
        assert_eq!(after.mtime(), 2_000);
        assert_ne!(after.signature(), before.signature());
        assert_eq!(after.ctime(), before.ctime());
    }

    #[test]
    fn test_mtime_never_regresses() {
        let before = meta();
        let mut after = before.clone();

        Mutator::stamp_at(&before, &mut after, 500);
        assert_eq!(after.mtime(), 1_000);
    }

    #[test]
    fn test_stamp_restores_identity_fields() {
        let before = meta();
        let mut after = before.clone();
        after.insert_order = 99;
        after.ctime = 1;

        Mutator::stamp_at(&before, &mut after, 1_500);
        assert_eq!(after.insert_order(), 7);
        assert_eq!(after.ctime(), 1_000);
    }
}
