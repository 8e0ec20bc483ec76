//! orgvault - encrypted organization and user directory
//!
//! Orgs and users live in SQLite. User PII (display name, public key, email)
//! is sealed with AES-256-GCM under a versioned key ring, with a SHA-256
//! digest kept beside each ciphertext for lookup and tamper detection. Every
//! write goes through one transactional update function that enforces
//! optimistic concurrency via per-record signatures and appends an audit
//! record for each watched column that changed.
//!
//! # Architecture
//!
//! - `crypto`: keys, key ring, envelope cipher, digests, password hashing
//! - `models`: orgs, users, IDs and shared record metadata
//! - `mutator`: timestamp and signature stamping
//! - `audit`: watch-lists and the audit recorder
//! - `storage`: SQLite schema, repositories and transactions
//! - `services`: the update function and the org/user/audit services
//! - `export`: audit trail export (JSON, YAML, CSV)
//! - `config`: paths, settings and the key file
//! - `cli`, `display`: the `orgvault` binary's commands and output
//!
//! # Example
//!
//! ```rust,ignore
//! use orgvault::config::{KeyFile, VaultPaths};
//! use orgvault::models::{NewOrg, NewUser};
//! use orgvault::services::OrgService;
//! use orgvault::storage::Storage;
//!
//! let paths = VaultPaths::new()?;
//! let keys = KeyFile::load(&paths)?.to_keyring()?;
//! let storage = Storage::new(&paths)?;
//! let owner = NewUser::new("Ada", "pk-ada", "ada@example.com", password_hash);
//! let created = OrgService::new(&storage, &keys).create(NewOrg::new("acme", owner))?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod mutator;
pub mod services;
pub mod storage;

pub use error::{VaultError, VaultResult};
