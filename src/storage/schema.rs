//! Database schema
//!
//! Tables are created idempotently every time a store is opened.

use rusqlite::Connection;

use crate::error::VaultResult;

/// On-disk format version recorded in `meta`
pub const FORMAT_VERSION: &str = "1";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS orgs (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    owner TEXT NOT NULL,
    ctime INTEGER NOT NULL,
    mtime INTEGER NOT NULL,
    insert_order INTEGER NOT NULL UNIQUE,
    role INTEGER NOT NULL CHECK (role IN (1, 2, 3)),
    schema_version INTEGER NOT NULL DEFAULT 0,
    signature TEXT NOT NULL UNIQUE,
    status INTEGER NOT NULL CHECK (status IN (1, 2, 3))
);

CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    display_name_digest TEXT NOT NULL,
    public_key TEXT NOT NULL,
    public_key_digest TEXT NOT NULL,
    email TEXT NOT NULL,
    email_digest TEXT NOT NULL,
    key_version TEXT NOT NULL,
    org TEXT NOT NULL,
    password TEXT NOT NULL,
    ctime INTEGER NOT NULL,
    mtime INTEGER NOT NULL,
    insert_order INTEGER NOT NULL UNIQUE,
    role INTEGER NOT NULL CHECK (role IN (1, 2, 3)),
    schema_version INTEGER NOT NULL DEFAULT 0,
    signature TEXT NOT NULL UNIQUE,
    status INTEGER NOT NULL CHECK (status IN (1, 2, 3)),
    UNIQUE (org, email_digest),
    UNIQUE (org, public_key_digest)
);

CREATE INDEX IF NOT EXISTS users_by_org ON users (org);

CREATE TABLE IF NOT EXISTS audit (
    audit_table TEXT NOT NULL CHECK (audit_table IN ('orgs', 'users')),
    audit_id TEXT NOT NULL,
    audit_column TEXT NOT NULL,
    old_mtime INTEGER NOT NULL,
    new_mtime INTEGER NOT NULL,
    old_signature TEXT NOT NULL,
    new_signature TEXT NOT NULL,
    details TEXT NOT NULL,
    insert_order INTEGER NOT NULL UNIQUE,
    ctime INTEGER NOT NULL,
    PRIMARY KEY (new_signature, audit_column),
    UNIQUE (old_signature, audit_column)
);

CREATE INDEX IF NOT EXISTS audit_by_entity ON audit (audit_table, audit_id);

CREATE TABLE IF NOT EXISTS sequences (
    name TEXT PRIMARY KEY,
    value INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS signatures (
    signature TEXT PRIMARY KEY,
    source_table TEXT NOT NULL,
    ctime INTEGER NOT NULL
);
"#;

/// Create all tables and record the format version
pub fn initialize(conn: &Connection) -> VaultResult<()> {
    conn.execute_batch(SCHEMA)?;
    conn.execute(
        "INSERT OR IGNORE INTO meta (key, value) VALUES ('format_version', ?)",
        [FORMAT_VERSION],
    )?;
    Ok(())
}

/// Stored format version, if the database has been initialized
pub fn format_version(conn: &Connection) -> VaultResult<Option<String>> {
    use rusqlite::OptionalExtension;

    Ok(conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'format_version'",
            [],
            |row| row.get(0),
        )
        .optional()?)
}
