//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Every mutating
//! command takes the record's current signature via `--expected`; the
//! handlers print the new signature so the next command can chain on it.

pub mod audit;
pub mod keys;
pub mod org;
pub mod user;

pub use audit::{handle_audit_command, AuditCommands};
pub use keys::{handle_keys_command, KeysCommands};
pub use org::{handle_org_command, OrgCommands};
pub use user::{handle_user_command, UserCommands};

use crate::audit::AuditRecord;
use crate::config::Settings;
use crate::crypto::hash_password;
use crate::error::{VaultError, VaultResult};
use crate::models::{Role, Signature, Status, UserId};

pub(crate) fn parse_signature(s: &str) -> VaultResult<Signature> {
    s.trim()
        .parse()
        .map_err(|_| VaultError::Validation(format!("Invalid signature: '{}'", s)))
}

pub(crate) fn parse_user_id(s: &str) -> VaultResult<UserId> {
    s.trim()
        .parse()
        .map_err(|_| VaultError::Validation(format!("Invalid user ID: '{}'", s)))
}

pub(crate) fn parse_status(s: &str) -> VaultResult<Status> {
    Status::parse(s).ok_or_else(|| {
        VaultError::Validation(format!(
            "Invalid status: '{}'. Valid statuses: unconfirmed, active, inactive",
            s
        ))
    })
}

pub(crate) fn parse_role(s: &str) -> VaultResult<Role> {
    Role::parse(s).ok_or_else(|| {
        VaultError::Validation(format!(
            "Invalid role: '{}'. Valid roles: normal, admin, test",
            s
        ))
    })
}

/// Hash a password given on the command line, or prompt for one twice
pub(crate) fn read_password(flag: Option<String>, settings: &Settings) -> VaultResult<String> {
    let plain = match flag {
        Some(p) => p,
        None => {
            let first = prompt_password("Password: ")?;
            let second = prompt_password("Confirm password: ")?;
            if first != second {
                return Err(VaultError::Validation("Passwords do not match".into()));
            }
            first
        }
    };
    hash_password(&plain, &settings.password)
}

fn prompt_password(prompt: &str) -> VaultResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|e| VaultError::Io(format!("Failed to read password: {}", e)))
}

/// Report the outcome of an accepted mutation
pub(crate) fn print_mutation(what: &str, signature: Signature, audit: &[AuditRecord]) {
    println!("Updated {}", what);
    println!("  Signature: {}", signature);
    if audit.is_empty() {
        println!("  Audit: no watched columns changed");
    }
    for record in audit {
        println!("  Audit: {}", record.format_human_readable().replace('\n', "\n  "));
    }
}
