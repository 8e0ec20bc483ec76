//! Audit trail CLI commands

use clap::{Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::audit::AuditTable;
use crate::display::format_audit_list;
use crate::error::{VaultError, VaultResult};
use crate::export::{export_audit_csv, export_audit_json, export_audit_yaml};
use crate::services::AuditService;
use crate::storage::{AuditFilter, Storage};

/// Export formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
}

/// Audit subcommands
#[derive(Subcommand)]
pub enum AuditCommands {
    /// List audit records, oldest first
    List {
        /// Only records for this table (orgs, users)
        #[arg(short, long)]
        table: Option<String>,
        /// Only records for this org or user ID
        #[arg(short, long)]
        id: Option<String>,
        /// Only records for this column
        #[arg(short, long)]
        column: Option<String>,
        /// Maximum number of records
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Export the audit trail
    Export {
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Compact JSON
        #[arg(long)]
        compact: bool,
        /// Only records for this table (orgs, users)
        #[arg(short, long)]
        table: Option<String>,
    },
}

fn parse_table(s: &str) -> VaultResult<AuditTable> {
    AuditTable::parse(s).ok_or_else(|| {
        VaultError::Validation(format!("Invalid audit table: '{}'. Valid tables: orgs, users", s))
    })
}

/// Entity IDs are stored as bare UUIDs
fn bare_id(s: &str) -> String {
    let s = s.trim();
    ["org-", "usr-"]
        .iter()
        .find_map(|prefix| s.strip_prefix(prefix))
        .unwrap_or(s)
        .to_string()
}

/// Handle an audit command
pub fn handle_audit_command(storage: &Storage, cmd: AuditCommands) -> VaultResult<()> {
    match cmd {
        AuditCommands::List {
            table,
            id,
            column,
            limit,
        } => {
            let filter = AuditFilter {
                table: table.as_deref().map(parse_table).transpose()?,
                audit_id: id.as_deref().map(bare_id),
                column,
                limit,
            };
            let records = AuditService::new(storage).list(&filter)?;
            print!("{}", format_audit_list(&records));
        }

        AuditCommands::Export {
            format,
            output,
            compact,
            table,
        } => {
            let filter = AuditFilter {
                table: table.as_deref().map(parse_table).transpose()?,
                ..AuditFilter::default()
            };

            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(BufWriter::new(io::stdout())),
            };

            match format {
                ExportFormat::Json => export_audit_json(storage, &filter, &mut writer, !compact)?,
                ExportFormat::Yaml => export_audit_yaml(storage, &filter, &mut writer)?,
                ExportFormat::Csv => export_audit_csv(storage, &filter, &mut writer)?,
            }
            writer.flush()?;

            if let Some(path) = output {
                eprintln!("Exported audit trail to {}", path.display());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id() {
        assert_eq!(bare_id("org-abc"), "abc");
        assert_eq!(bare_id(" usr-abc "), "abc");
        assert_eq!(bare_id("abc"), "abc");
    }

    #[test]
    fn test_parse_table() {
        assert_eq!(parse_table("users").unwrap(), AuditTable::Users);
        assert!(parse_table("accounts").is_err());
    }
}
