//! Service layer for orgvault
//!
//! Services own validation and transaction boundaries. Every update of an
//! org or user runs through [`mutation::mutate`].

pub mod audit;
pub mod mutation;
pub mod org;
pub mod user;

pub use audit::AuditService;
pub use mutation::{mutate, Mutation};
pub use org::{CreatedOrg, OrgService};
pub use user::UserService;
