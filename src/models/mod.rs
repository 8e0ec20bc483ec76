//! Core data models for orgvault
//!
//! Organizations and users, the metadata envelope every versioned record
//! carries, and the encrypted column representation.

pub mod encrypted;
pub mod ids;
pub mod meta;
pub mod org;
pub mod status;
pub mod user;

pub use encrypted::EncryptedField;
pub use ids::{KeyVersion, OrgId, Signature, UserId};
pub use meta::{Metadata, SCHEMA_VERSION};
pub use org::{NewOrg, Org, OrgValidationError};
pub use status::{Role, Status};
pub use user::{NewUser, User, UserValidationError};
