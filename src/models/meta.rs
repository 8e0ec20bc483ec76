//! Metadata envelope shared by every versioned record
//!
//! `mtime` and `signature` can only be written inside the crate, by the
//! [`Mutator`](crate::mutator::Mutator). Callers read them through getters.

use serde::{Deserialize, Serialize};

use super::ids::Signature;
use super::status::{Role, Status};

/// Schema version written on new org and user rows
pub const SCHEMA_VERSION: i64 = 0;

/// Creation/modification bookkeeping for a versioned record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub(crate) ctime: i64,
    pub(crate) mtime: i64,
    pub(crate) insert_order: i64,
    pub(crate) signature: Signature,
    pub(crate) status: Status,
    pub(crate) role: Role,
    pub(crate) schema_version: i64,
}

impl Metadata {
    /// Creation time (Unix seconds)
    pub fn ctime(&self) -> i64 {
        self.ctime
    }

    /// Last modification time (Unix seconds)
    pub fn mtime(&self) -> i64 {
        self.mtime
    }

    /// Global insertion sequence number
    pub fn insert_order(&self) -> i64 {
        self.insert_order
    }

    /// Current optimistic-concurrency fingerprint
    pub fn signature(&self) -> Signature {
        self.signature
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn schema_version(&self) -> i64 {
        self.schema_version
    }
}
