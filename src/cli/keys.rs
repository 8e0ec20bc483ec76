//! Key management CLI commands
//!
//! Keys live in keys.json. Rotation adds a version and makes it current;
//! old versions are never removed, since rows sealed under them must stay
//! readable until they are rekeyed.

use clap::Subcommand;
use tracing::info;

use crate::config::{KeyFile, VaultPaths};
use crate::error::{VaultError, VaultResult};
use crate::services::UserService;
use crate::storage::Storage;

/// Key subcommands
#[derive(Subcommand)]
pub enum KeysCommands {
    /// Create a key file with one fresh key
    Generate,
    /// Add a new key and make it current
    Rotate {
        /// Re-seal every user still on an older key
        #[arg(long)]
        rekey: bool,
    },
    /// List key versions and how many users still need rekeying
    List,
}

/// Handle a keys command
pub fn handle_keys_command(paths: &VaultPaths, cmd: KeysCommands) -> VaultResult<()> {
    match cmd {
        KeysCommands::Generate => {
            if paths.keys_file().exists() {
                return Err(VaultError::Config(format!(
                    "Key file already exists at {}",
                    paths.keys_file().display()
                )));
            }
            let file = KeyFile::generate();
            file.save(paths)?;
            println!("Generated key file: {}", paths.keys_file().display());
            println!("  Current version: {}", file.current);
        }

        KeysCommands::Rotate { rekey } => {
            let mut file = KeyFile::load(paths)?;
            let previous = file.current;
            let version = file.rotate();
            file.save(paths)?;
            println!("Rotated key: {} -> {}", previous, version);

            if rekey {
                let ring = file.to_keyring()?;
                let storage = Storage::new(paths)?;
                let count = rekey_stale(&UserService::new(&storage, &ring))?;
                println!("Rekeyed {} user(s)", count);
            }
        }

        KeysCommands::List => {
            let file = KeyFile::load(paths)?;
            for version in file.keys.keys() {
                let marker = if *version == file.current { " (current)" } else { "" };
                println!("{}{}", version, marker);
            }

            let ring = file.to_keyring()?;
            let storage = Storage::new(paths)?;
            let stale = UserService::new(&storage, &ring).stale()?;
            println!();
            println!("Users on an older key: {}", stale.len());
        }
    }

    Ok(())
}

/// Rekey every user not yet on the current version, at their current signature
fn rekey_stale(service: &UserService<'_>) -> VaultResult<usize> {
    let stale = service.stale()?;
    for id in &stale {
        let user = service.require(*id)?;
        service.rekey(*id, user.meta().signature())?;
    }
    info!(count = stale.len(), "rekeyed users after rotation");
    Ok(stale.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewOrg, NewUser};
    use crate::services::OrgService;

    #[test]
    fn test_rekey_stale_moves_everyone_to_current() {
        let storage = Storage::open_in_memory().unwrap();
        let mut file = KeyFile::generate();
        let ring = file.to_keyring().unwrap();
        OrgService::new(&storage, &ring)
            .create(NewOrg::new(
                "acme",
                NewUser::new("Owner", "pk-owner", "owner@acme.test", "$argon2id$stub"),
            ))
            .unwrap();

        file.rotate();
        let rotated = file.to_keyring().unwrap();
        let service = UserService::new(&storage, &rotated);
        assert_eq!(service.stale().unwrap().len(), 1);

        assert_eq!(rekey_stale(&service).unwrap(), 1);
        assert!(service.stale().unwrap().is_empty());
    }
}
