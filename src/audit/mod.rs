//! Tamper-evident audit trail
//!
//! Every mutation of a watched column appends one row to the `audit` table
//! in the same transaction as the mutation itself.
//!
//! # Architecture
//!
//! - `watch`: per-entity watch-lists as closed enums (`OrgColumn`, `UserColumn`)
//!   behind the `Watched` trait.
//! - `AuditRecorder`: diffs before/after state over the watch-list and inserts
//!   the resulting `AuditRecord`s.
//! - Uniqueness on `(old_signature, audit_column)` and
//!   `(new_signature, audit_column)` makes the table append-only: a state
//!   transition cannot be recorded twice.
//!
//! # Example
//!
//! ```rust,ignore
//! let records = storage.transaction(|tx| {
//!     // ... persist `after` guarded by `before`'s signature ...
//!     AuditRecorder::record(tx, &before, &after)
//! })?;
//! ```

mod entry;
mod recorder;
pub mod watch;

pub use entry::{format_value, AuditDetails, AuditRecord, AuditTable};
pub use recorder::AuditRecorder;
pub use watch::{OrgColumn, UserColumn, WatchColumn, Watched};
