//! Org CLI commands

use clap::Subcommand;

use super::{parse_role, parse_signature, parse_status, parse_user_id, print_mutation, read_password};
use crate::config::Settings;
use crate::crypto::KeyRing;
use crate::display::{format_org_details, format_org_list};
use crate::error::{VaultError, VaultResult};
use crate::models::{NewOrg, NewUser, Org};
use crate::services::OrgService;
use crate::storage::Storage;

/// Org subcommands
#[derive(Subcommand)]
pub enum OrgCommands {
    /// Create an org together with its owner
    Create {
        /// Org name
        name: String,
        /// Owner's display name
        #[arg(long)]
        owner_name: String,
        /// Owner's email address
        #[arg(long)]
        owner_email: String,
        /// Owner's public key
        #[arg(long)]
        owner_public_key: String,
        /// Owner's password (prompted for if omitted)
        #[arg(long)]
        password: Option<String>,
        /// Role for the org and its owner (normal, admin, test)
        #[arg(long)]
        role: Option<String>,
        /// Initial org status
        #[arg(long, default_value = "unconfirmed")]
        status: String,
    },
    /// List all orgs
    List,
    /// Show an org and its members
    Show {
        /// Org name or ID
        org: String,
    },
    /// Change an org's status
    SetStatus {
        /// Org name or ID
        org: String,
        /// New status (unconfirmed, active, inactive)
        status: String,
        /// Current signature of the org
        #[arg(long)]
        expected: String,
    },
    /// Transfer ownership to another member
    SetOwner {
        /// Org name or ID
        org: String,
        /// User ID of the new owner
        user: String,
        /// Current signature of the org
        #[arg(long)]
        expected: String,
    },
    /// Rename an org
    Rename {
        /// Org name or ID
        org: String,
        /// New name
        name: String,
        /// Current signature of the org
        #[arg(long)]
        expected: String,
    },
}

fn find_org(service: &OrgService<'_>, identifier: &str) -> VaultResult<Org> {
    service
        .find(identifier)?
        .ok_or_else(|| VaultError::org_not_found(identifier))
}

/// Handle an org command
pub fn handle_org_command(
    storage: &Storage,
    keys: &KeyRing,
    settings: &Settings,
    cmd: OrgCommands,
) -> VaultResult<()> {
    let service = OrgService::new(storage, keys);

    match cmd {
        OrgCommands::Create {
            name,
            owner_name,
            owner_email,
            owner_public_key,
            password,
            role,
            status,
        } => {
            let role = match role {
                Some(r) => parse_role(&r)?,
                None => settings.default_role,
            };
            let status = parse_status(&status)?;
            let password = read_password(password, settings)?;

            let owner = NewUser::new(owner_name, owner_public_key, owner_email, password)
                .with_role(role);
            let created = service.create(
                NewOrg::new(name, owner)
                    .with_role(role)
                    .with_status(status),
            )?;

            println!("Created org: {}", created.org.name);
            println!("  ID:        {}", created.org.id);
            println!("  Status:    {}", created.org.meta().status());
            println!("  Signature: {}", created.org.meta().signature());
            println!("Owner: {}", created.owner.display_name());
            println!("  ID:        {}", created.owner.id);
            println!("  Status:    {}", created.owner.meta().status());
            println!("  Signature: {}", created.owner.meta().signature());
        }

        OrgCommands::List => {
            let orgs = service.list()?;
            print!("{}", format_org_list(&orgs));
        }

        OrgCommands::Show { org } => {
            let found = find_org(&service, &org)?;
            let members = service.members(found.id)?;
            print!("{}", format_org_details(&found, &members));
        }

        OrgCommands::SetStatus {
            org,
            status,
            expected,
        } => {
            let found = find_org(&service, &org)?;
            let mutation =
                service.update_status(found.id, parse_signature(&expected)?, parse_status(&status)?)?;
            print_mutation(
                &format!("org: {}", mutation.record.name),
                mutation.signature(),
                &mutation.audit,
            );
        }

        OrgCommands::SetOwner {
            org,
            user,
            expected,
        } => {
            let found = find_org(&service, &org)?;
            let mutation =
                service.update_owner(found.id, parse_signature(&expected)?, parse_user_id(&user)?)?;
            print_mutation(
                &format!("org: {}", mutation.record.name),
                mutation.signature(),
                &mutation.audit,
            );
        }

        OrgCommands::Rename {
            org,
            name,
            expected,
        } => {
            let found = find_org(&service, &org)?;
            let mutation = service.rename(found.id, parse_signature(&expected)?, &name)?;
            print_mutation(
                &format!("org: {}", mutation.record.name),
                mutation.signature(),
                &mutation.audit,
            );
        }
    }

    Ok(())
}
