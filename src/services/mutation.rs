//! The transactional update function
//!
//! Every change to an org or user goes through [`mutate`], inside a write
//! transaction opened by the caller. The steps run in a fixed order:
//!
//! 1. load the current row and compare the caller's expected signature
//! 2. apply the caller's change to a copy
//! 3. stamp mtime and a fresh signature ([`Mutator`])
//! 4. persist, guarded by the old signature
//! 5. register the new signature
//! 6. append audit records for changed watched columns ([`AuditRecorder`])
//!
//! Commit happens when the caller's transaction closure returns `Ok`. An
//! error at any step leaves no trace of the mutation or its audit rows.

use tracing::warn;

use crate::audit::{AuditRecord, AuditRecorder};
use crate::crypto::KeyRing;
use crate::error::{VaultError, VaultResult};
use crate::models::Signature;
use crate::mutator::Mutator;
use crate::storage::{SignatureRegistry, Tx, VersionedRecord};

/// Result of an accepted mutation
#[derive(Debug, Clone)]
pub struct Mutation<R> {
    /// State after the mutation, as persisted
    pub record: R,
    /// Audit rows appended by the mutation, in insertion order
    pub audit: Vec<AuditRecord>,
}

impl<R: VersionedRecord> Mutation<R> {
    pub fn signature(&self) -> Signature {
        self.record.metadata().signature()
    }
}

fn stale<R: VersionedRecord>(id: R::Id, expected: Signature, actual: Signature) -> VaultError {
    warn!(
        entity = R::ENTITY,
        id = %id,
        expected = %expected.short(),
        actual = %actual.short(),
        "rejected mutation with stale signature"
    );
    VaultError::StaleSignature {
        entity_type: R::ENTITY,
        identifier: id.to_string(),
        expected,
        actual,
    }
}

/// Apply `change` to record `id` if its signature is still `expected`
pub fn mutate<R, F>(
    tx: &Tx<'_>,
    ring: &KeyRing,
    id: R::Id,
    expected: Signature,
    change: F,
) -> VaultResult<Mutation<R>>
where
    R: VersionedRecord,
    F: FnOnce(&mut R) -> VaultResult<()>,
{
    let before = R::load(tx, ring, id)?.ok_or_else(|| VaultError::NotFound {
        entity_type: R::ENTITY,
        identifier: id.to_string(),
    })?;

    let actual = before.metadata().signature();
    if actual != expected {
        return Err(stale::<R>(id, expected, actual));
    }

    let mut after = before.clone();
    change(&mut after)?;
    after.prepare_write(ring);
    Mutator::stamp(before.metadata(), after.meta_mut());

    if !after.store(tx, ring, expected)? {
        // Unreachable while the write lock is held; report what is there now.
        let current = R::load(tx, ring, id)?.ok_or_else(|| VaultError::NotFound {
            entity_type: R::ENTITY,
            identifier: id.to_string(),
        })?;
        return Err(stale::<R>(id, expected, current.metadata().signature()));
    }

    let new_meta = after.metadata();
    SignatureRegistry::register(tx, new_meta.signature(), R::TABLE, new_meta.mtime())?;

    let audit = AuditRecorder::record(tx, &before, &after)?;

    Ok(Mutation {
        record: after,
        audit,
    })
}
