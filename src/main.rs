use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use orgvault::cli::{
    handle_audit_command, handle_keys_command, handle_org_command, handle_user_command,
    AuditCommands, KeysCommands, OrgCommands, UserCommands,
};
use orgvault::config::{KeyFile, Settings, VaultPaths};
use orgvault::storage::Storage;

#[derive(Parser)]
#[command(
    name = "orgvault",
    author = "Kaylee Beyene",
    version,
    about = "Encrypted organization and user directory with an audit trail",
    long_about = "orgvault stores organizations and their users in SQLite. User \
                  PII is sealed with AES-256-GCM under a rotating key set, and every \
                  change to a watched column is recorded in an append-only audit trail."
)]
struct Cli {
    /// Vault directory (defaults to the platform config directory)
    #[arg(long, global = true, env = "ORGVAULT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the vault directory, key file, settings and database
    Init,

    /// Show current configuration and paths
    Config,

    /// Key management commands
    #[command(subcommand)]
    Keys(KeysCommands),

    /// Org management commands
    #[command(subcommand)]
    Org(OrgCommands),

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Audit trail commands
    #[command(subcommand)]
    Audit(AuditCommands),
}

fn init_logging(settings: &Settings) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = VaultPaths::resolve(cli.data_dir)?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(&settings);

    match cli.command {
        Some(Commands::Init) => {
            if paths.is_initialized() {
                bail!("Vault already initialized at {}", paths.base_dir().display());
            }
            println!("Initializing orgvault at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            let keys = KeyFile::generate();
            keys.save(&paths)?;
            Storage::new(&paths)?;
            println!("Initialization complete!");
            println!("  Key version: {}", keys.current);
            println!();
            println!("Run 'orgvault org create --help' to add your first org.");
        }
        Some(Commands::Config) => {
            println!("orgvault Configuration");
            println!("======================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Key file:       {}", paths.keys_file().display());
            println!("Database:       {}", paths.database_file().display());
            println!();
            println!("Settings:");
            println!("  Log filter:   {}", settings.log_filter);
            println!("  Default role: {}", settings.default_role);
            println!(
                "  Password:     argon2id m={} t={} p={}",
                settings.password.memory_cost,
                settings.password.time_cost,
                settings.password.parallelism
            );
        }
        Some(Commands::Keys(cmd)) => {
            handle_keys_command(&paths, cmd)?;
        }
        Some(Commands::Org(cmd)) => {
            let keys = KeyFile::load(&paths)?.to_keyring()?;
            let storage = Storage::new(&paths)?;
            handle_org_command(&storage, &keys, &settings, cmd)?;
        }
        Some(Commands::User(cmd)) => {
            let keys = KeyFile::load(&paths)?.to_keyring()?;
            let storage = Storage::new(&paths)?;
            handle_user_command(&storage, &keys, &settings, cmd)?;
        }
        Some(Commands::Audit(cmd)) => {
            let storage = Storage::new(&paths)?;
            handle_audit_command(&storage, cmd)?;
        }
        None => {
            println!("orgvault - encrypted org and user directory");
            println!();
            println!("Run 'orgvault --help' for usage information.");
        }
    }

    Ok(())
}
