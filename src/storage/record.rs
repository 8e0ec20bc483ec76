//! Versioned record persistence
//!
//! The transactional update function is generic over this trait: it loads a
//! record, lets the caller change it, and stores it back guarded by the
//! signature it was loaded with.

use rusqlite::types::ToSql;
use rusqlite::Connection;
use std::fmt;

use crate::audit::Watched;
use crate::crypto::KeyRing;
use crate::error::VaultResult;
use crate::models::{Metadata, Signature};

pub trait VersionedRecord: Watched + Clone {
    type Id: Copy + fmt::Display + ToSql;

    /// Name used in error messages
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    fn meta_mut(&mut self) -> &mut Metadata;

    /// Bring derived state in line with the ring before a write
    fn prepare_write(&mut self, _ring: &KeyRing) {}

    fn load(conn: &Connection, ring: &KeyRing, id: Self::Id) -> VaultResult<Option<Self>>;

    /// Overwrite the stored row only if its signature is still `expected`.
    /// Returns false if no row matched.
    fn store(&self, conn: &Connection, ring: &KeyRing, expected: Signature) -> VaultResult<bool>;
}
