//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for orgs, users and the audit trail.

pub mod audit;
pub mod org;
pub mod user;

pub use audit::format_audit_list;
pub use org::{format_org_details, format_org_list};
pub use user::{format_user_details, format_user_list};

use chrono::{TimeZone, Utc};

/// Render a Unix timestamp as UTC, falling back to the raw number
pub(crate) fn format_timestamp(secs: i64) -> String {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20");
    }
}
