//! Configuration module for orgvault
//!
//! - Path resolution for the vault directory
//! - User settings persistence
//! - The on-disk key set

pub mod keys;
pub mod paths;
pub mod settings;

pub use keys::KeyFile;
pub use paths::VaultPaths;
pub use settings::Settings;
