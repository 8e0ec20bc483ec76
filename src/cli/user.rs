//! User CLI commands

use clap::Subcommand;

use super::{parse_role, parse_signature, parse_status, parse_user_id, print_mutation, read_password};
use crate::config::Settings;
use crate::crypto::KeyRing;
use crate::display::{format_user_details, format_user_list};
use crate::error::{VaultError, VaultResult};
use crate::models::{NewUser, Signature, User, UserId};
use crate::services::{Mutation, OrgService, UserService};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a user to an existing org
    Create {
        /// Org name or ID
        org: String,
        /// Display name
        #[arg(long)]
        name: String,
        /// Email address
        #[arg(long)]
        email: String,
        /// Public key
        #[arg(long)]
        public_key: String,
        /// Password (prompted for if omitted)
        #[arg(long)]
        password: Option<String>,
        /// Role (normal, admin, test)
        #[arg(long)]
        role: Option<String>,
    },
    /// List the members of an org
    List {
        /// Org name or ID
        org: String,
    },
    /// Show a user's decrypted details
    Show {
        /// User ID
        user: String,
    },
    /// Change a user's status
    SetStatus {
        user: String,
        /// New status (unconfirmed, active, inactive)
        status: String,
        /// Current signature of the user
        #[arg(long)]
        expected: String,
    },
    /// Change a user's display name
    SetDisplayName {
        user: String,
        name: String,
        #[arg(long)]
        expected: String,
    },
    /// Change a user's email address
    SetEmail {
        user: String,
        email: String,
        #[arg(long)]
        expected: String,
    },
    /// Change a user's public key
    SetPublicKey {
        user: String,
        public_key: String,
        #[arg(long)]
        expected: String,
    },
    /// Set a new password
    SetPassword {
        user: String,
        /// New password (prompted for if omitted)
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        expected: String,
    },
    /// Check a password against the stored hash
    CheckPassword {
        user: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Re-seal a user's data under the current key
    Rekey {
        user: String,
        #[arg(long)]
        expected: String,
    },
}

fn report(mutation: Mutation<User>) {
    print_mutation(
        &format!("user: {}", mutation.record.id),
        mutation.signature(),
        &mutation.audit,
    );
}

fn ids(user: &str, expected: &str) -> VaultResult<(UserId, Signature)> {
    Ok((parse_user_id(user)?, parse_signature(expected)?))
}

/// Handle a user command
pub fn handle_user_command(
    storage: &Storage,
    keys: &KeyRing,
    settings: &Settings,
    cmd: UserCommands,
) -> VaultResult<()> {
    let service = UserService::new(storage, keys);

    match cmd {
        UserCommands::Create {
            org,
            name,
            email,
            public_key,
            password,
            role,
        } => {
            let found = OrgService::new(storage, keys)
                .find(&org)?
                .ok_or_else(|| VaultError::org_not_found(&org))?;
            let role = match role {
                Some(r) => parse_role(&r)?,
                None => settings.default_role,
            };
            let password = read_password(password, settings)?;

            let user = service.create(
                found.id,
                NewUser::new(name, public_key, email, password).with_role(role),
            )?;
            println!("Created user: {}", user.display_name());
            println!("  ID:        {}", user.id);
            println!("  Org:       {}", found.name);
            println!("  Signature: {}", user.meta().signature());
        }

        UserCommands::List { org } => {
            let orgs = OrgService::new(storage, keys);
            let found = orgs
                .find(&org)?
                .ok_or_else(|| VaultError::org_not_found(&org))?;
            print!("{}", format_user_list(&orgs.members(found.id)?));
        }

        UserCommands::Show { user } => {
            let found = service.require(parse_user_id(&user)?)?;
            print!("{}", format_user_details(&found));
        }

        UserCommands::SetStatus {
            user,
            status,
            expected,
        } => {
            let (id, expected) = ids(&user, &expected)?;
            report(service.update_status(id, expected, parse_status(&status)?)?);
        }

        UserCommands::SetDisplayName {
            user,
            name,
            expected,
        } => {
            let (id, expected) = ids(&user, &expected)?;
            report(service.update_display_name(id, expected, &name)?);
        }

        UserCommands::SetEmail {
            user,
            email,
            expected,
        } => {
            let (id, expected) = ids(&user, &expected)?;
            report(service.update_email(id, expected, &email)?);
        }

        UserCommands::SetPublicKey {
            user,
            public_key,
            expected,
        } => {
            let (id, expected) = ids(&user, &expected)?;
            report(service.update_public_key(id, expected, &public_key)?);
        }

        UserCommands::SetPassword {
            user,
            password,
            expected,
        } => {
            let (id, expected) = ids(&user, &expected)?;
            let encoded = read_password(password, settings)?;
            report(service.update_password(id, expected, &encoded)?);
        }

        UserCommands::CheckPassword { user, password } => {
            let id = parse_user_id(&user)?;
            let guess = match password {
                Some(p) => p,
                None => rpassword::prompt_password("Password: ")
                    .map_err(|e| VaultError::Io(format!("Failed to read password: {}", e)))?,
            };
            if service.verify_password(id, &guess)? {
                println!("Password matches.");
            } else {
                return Err(VaultError::Validation("Password does not match".into()));
            }
        }

        UserCommands::Rekey { user, expected } => {
            let (id, expected) = ids(&user, &expected)?;
            report(service.rekey(id, expected)?);
        }
    }

    Ok(())
}
