//! Storage layer for orgvault
//!
//! A single SQLite database behind a mutex. Reads borrow the connection;
//! writes run inside `BEGIN IMMEDIATE` transactions so a mutation holds the
//! database write lock from its first read to its commit.

pub mod audit;
pub mod orgs;
pub mod record;
pub mod schema;
pub mod sequence;
pub mod signatures;
pub mod users;

pub use audit::{AuditFilter, AuditRepository};
pub use orgs::OrgRepository;
pub use record::VersionedRecord;
pub use sequence::Sequences;
pub use signatures::SignatureRegistry;
pub use users::UserRepository;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::paths::VaultPaths;
use crate::error::{VaultError, VaultResult};

/// How long a writer waits on another process's lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Main storage coordinator owning the database connection
pub struct Storage {
    conn: Mutex<Connection>,
    sequences: Sequences,
    path: Option<PathBuf>,
}

/// An open write transaction.
///
/// Derefs to the underlying connection, so repositories take `&Connection`
/// and work the same inside or outside a transaction.
pub struct Tx<'a> {
    tx: Transaction<'a>,
    sequences: &'a Sequences,
}

impl Tx<'_> {
    /// Next org/user insertion order
    pub fn next_entity_order(&self) -> VaultResult<i64> {
        self.sequences.next_entity(&self.tx)
    }

    /// Next audit insertion order
    pub fn next_audit_order(&self) -> VaultResult<i64> {
        self.sequences.next_audit(&self.tx)
    }
}

impl Deref for Tx<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.tx
    }
}

impl Storage {
    /// Open (or create) the database at the configured location
    pub fn new(paths: &VaultPaths) -> VaultResult<Self> {
        paths.ensure_directories()?;
        Self::open(&paths.database_file())
    }

    /// Open (or create) a database file
    pub fn open(path: &Path) -> VaultResult<Self> {
        let conn = Connection::open(path)?;
        let storage = Self::from_connection(conn, Some(path.to_path_buf()))?;
        info!(path = %path.display(), "opened vault database");
        Ok(storage)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> VaultResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> VaultResult<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            sequences: Sequences::new(),
            path,
        })
    }

    /// Database file path, if not in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> VaultResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| VaultError::Storage("SQLite connection poisoned".to_string()))
    }

    /// Run a read-only closure against the connection
    pub fn read<R>(&self, f: impl FnOnce(&Connection) -> VaultResult<R>) -> VaultResult<R> {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Run `f` in one write transaction.
    ///
    /// Commits if `f` returns `Ok`; any error drops the transaction, which
    /// rolls back every statement it issued.
    ///
    /// After a rollback the sequence high-water marks are persisted in their
    /// own statement, so numbers the aborted transaction drew stay burned.
    pub fn transaction<R>(&self, f: impl FnOnce(&Tx<'_>) -> VaultResult<R>) -> VaultResult<R> {
        let mut conn = self.lock()?;

        match run_transaction(&mut conn, &self.sequences, f) {
            Ok(result) => {
                self.sequences.mark_committed();
                Ok(result)
            }
            Err(e) => {
                debug!(error = %e, "rolled back transaction");
                if let Err(persist) = self.sequences.persist(&conn) {
                    warn!(error = %persist, "failed to persist sequence high-water marks");
                }
                Err(e)
            }
        }
    }
}

fn run_transaction<R>(
    conn: &mut Connection,
    sequences: &Sequences,
    f: impl FnOnce(&Tx<'_>) -> VaultResult<R>,
) -> VaultResult<R> {
    let tx = Tx {
        tx: conn.transaction_with_behavior(TransactionBehavior::Immediate)?,
        sequences,
    };
    let result = f(&tx)?;
    tx.tx.commit()?;
    Ok(result)
}
