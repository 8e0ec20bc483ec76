//! YAML Export functionality
//!
//! Exports the audit trail to YAML format for human review.

use std::io::Write;

use crate::error::{VaultError, VaultResult};
use crate::export::json::AuditExport;
use crate::storage::{AuditFilter, Storage};

/// Export the audit trail to YAML format
pub fn export_audit_yaml<W: Write>(
    storage: &Storage,
    filter: &AuditFilter,
    writer: &mut W,
) -> VaultResult<()> {
    let export = AuditExport::from_storage(storage, filter)?;

    writeln!(writer, "# orgvault audit trail export")
        .map_err(|e| VaultError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| VaultError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| VaultError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| VaultError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| VaultError::Export(e.to_string()))?;

    Ok(())
}
