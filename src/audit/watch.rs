//! Watch-lists
//!
//! Each audited entity has a closed enum of the columns whose changes must be
//! recorded. Anything not listed is unwatched and never reaches the trail.

use serde_json::{json, Value};

use super::entry::AuditTable;
use crate::models::{Metadata, Org, User};

/// A column selector for one entity's watch-list
pub trait WatchColumn: Copy + Eq + std::fmt::Debug + 'static {
    /// Every watched column, in recording order
    const ALL: &'static [Self];

    /// Column name as stored in `audit.audit_column`
    fn name(self) -> &'static str;
}

/// An entity with an audit trail
pub trait Watched {
    type Column: WatchColumn;

    const TABLE: AuditTable;

    /// Id written to `audit.audit_id`
    fn audit_id(&self) -> String;

    fn metadata(&self) -> &Metadata;

    /// Current value of a watched column, as recorded in audit details
    fn watched_value(&self, column: Self::Column) -> Value;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgColumn {
    Owner,
    Status,
}

impl WatchColumn for OrgColumn {
    const ALL: &'static [Self] = &[Self::Owner, Self::Status];

    fn name(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Status => "status",
        }
    }
}

impl Watched for Org {
    type Column = OrgColumn;

    const TABLE: AuditTable = AuditTable::Orgs;

    fn audit_id(&self) -> String {
        self.id.as_uuid().to_string()
    }

    fn metadata(&self) -> &Metadata {
        &self.meta
    }

    fn watched_value(&self, column: OrgColumn) -> Value {
        match column {
            OrgColumn::Owner => json!(self.owner.as_uuid().to_string()),
            OrgColumn::Status => json!(self.meta.status.code()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    PublicKeyDigest,
    DisplayNameDigest,
    KeyVersion,
    Password,
    Status,
}

impl WatchColumn for UserColumn {
    const ALL: &'static [Self] = &[
        Self::PublicKeyDigest,
        Self::DisplayNameDigest,
        Self::KeyVersion,
        Self::Password,
        Self::Status,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::PublicKeyDigest => "public_key_digest",
            Self::DisplayNameDigest => "display_name_digest",
            Self::KeyVersion => "key_version",
            Self::Password => "password",
            Self::Status => "status",
        }
    }
}

impl Watched for User {
    type Column = UserColumn;

    const TABLE: AuditTable = AuditTable::Users;

    fn audit_id(&self) -> String {
        self.id.as_uuid().to_string()
    }

    fn metadata(&self) -> &Metadata {
        &self.meta
    }

    fn watched_value(&self, column: UserColumn) -> Value {
        match column {
            UserColumn::PublicKeyDigest => json!(self.public_key_digest()),
            UserColumn::DisplayNameDigest => json!(self.display_name_digest()),
            UserColumn::KeyVersion => json!(self.key_version.as_uuid().to_string()),
            UserColumn::Password => json!(self.password()),
            UserColumn::Status => json!(self.meta.status.code()),
        }
    }
}
