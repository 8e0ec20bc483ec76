//! User repository
//!
//! PII columns are sealed on the way in and opened on the way out. Every
//! write seals under the key named by the user's `key_version`, which the
//! write path sets to the ring's current version first.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::record::VersionedRecord;
use crate::crypto::KeyRing;
use crate::error::{VaultError, VaultResult};
use crate::models::{EncryptedField, KeyVersion, Metadata, OrgId, Signature, User, UserId};

pub struct UserRepository;

const SELECT: &str = "SELECT id, org, display_name, display_name_digest, public_key, \
                      public_key_digest, email, email_digest, key_version, password, ctime, \
                      mtime, insert_order, role, schema_version, signature, status FROM users";

/// A users row exactly as stored
struct StoredUser {
    id: UserId,
    org: OrgId,
    display_name: EncryptedField,
    public_key: EncryptedField,
    email: EncryptedField,
    key_version: KeyVersion,
    password: String,
    meta: Metadata,
}

struct SealedPii {
    display_name: EncryptedField,
    public_key: EncryptedField,
    email: EncryptedField,
}

impl SealedPii {
    /// Rows are only ever written under the ring's current key.
    fn seal(user: &User, ring: &KeyRing) -> VaultResult<Self> {
        if user.key_version != ring.current_version() {
            return Err(VaultError::Encryption(format!(
                "User {} is on key {}, writes require current key {}",
                user.id,
                user.key_version.short(),
                ring.current_version().short()
            )));
        }
        Ok(Self {
            display_name: EncryptedField::seal_current(user.display_name(), ring)?,
            public_key: EncryptedField::seal_current(user.public_key(), ring)?,
            email: EncryptedField::seal_current(user.email(), ring)?,
        })
    }
}

impl StoredUser {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let key_version: KeyVersion = row.get(8)?;
        let field = |ciphertext: usize, digest: usize| -> rusqlite::Result<EncryptedField> {
            Ok(EncryptedField {
                ciphertext: row.get(ciphertext)?,
                digest: row.get(digest)?,
                key_version,
            })
        };

        Ok(Self {
            id: row.get(0)?,
            org: row.get(1)?,
            display_name: field(2, 3)?,
            public_key: field(4, 5)?,
            email: field(6, 7)?,
            key_version,
            password: row.get(9)?,
            meta: Metadata {
                ctime: row.get(10)?,
                mtime: row.get(11)?,
                insert_order: row.get(12)?,
                role: row.get(13)?,
                schema_version: row.get(14)?,
                signature: row.get(15)?,
                status: row.get(16)?,
            },
        })
    }

    fn open(self, ring: &KeyRing) -> VaultResult<User> {
        Ok(User::from_parts(
            self.id,
            self.org,
            self.display_name.open(ring)?,
            self.public_key.open(ring)?,
            self.email.open(ring)?,
            self.key_version,
            self.password,
            self.meta,
        ))
    }
}

impl UserRepository {
    pub fn insert(conn: &Connection, ring: &KeyRing, user: &User) -> VaultResult<()> {
        let sealed = SealedPii::seal(user, ring)?;
        let meta = &user.meta;
        conn.execute(
            "INSERT INTO users (id, org, display_name, display_name_digest, public_key, \
             public_key_digest, email, email_digest, key_version, password, ctime, mtime, \
             insert_order, role, schema_version, signature, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                user.id,
                user.org,
                sealed.display_name.ciphertext,
                sealed.display_name.digest,
                sealed.public_key.ciphertext,
                sealed.public_key.digest,
                sealed.email.ciphertext,
                sealed.email.digest,
                user.key_version,
                user.password(),
                meta.ctime,
                meta.mtime,
                meta.insert_order,
                meta.role,
                meta.schema_version,
                meta.signature,
                meta.status,
            ],
        )?;
        Ok(())
    }

    /// Load and decrypt a user
    pub fn get(conn: &Connection, ring: &KeyRing, id: UserId) -> VaultResult<Option<User>> {
        let stored = conn
            .query_row(&format!("{} WHERE id = ?", SELECT), [id], StoredUser::from_row)
            .optional()?;
        stored.map(|s| s.open(ring)).transpose()
    }

    /// Org a user belongs to, without decrypting anything
    pub fn org_of(conn: &Connection, id: UserId) -> VaultResult<Option<OrgId>> {
        Ok(conn
            .query_row("SELECT org FROM users WHERE id = ?", [id], |row| row.get(0))
            .optional()?)
    }

    /// Ids of users still sealed under a version other than `current`
    pub fn stale_key_versions(conn: &Connection, current: KeyVersion) -> VaultResult<Vec<UserId>> {
        let mut stmt =
            conn.prepare("SELECT id FROM users WHERE key_version != ? ORDER BY insert_order")?;
        let ids = stmt
            .query_map([current], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Decrypted members of an org, in insertion order
    pub fn list_by_org(conn: &Connection, ring: &KeyRing, org: OrgId) -> VaultResult<Vec<User>> {
        let mut stmt = conn.prepare(&format!("{} WHERE org = ? ORDER BY insert_order", SELECT))?;
        let stored = stmt
            .query_map([org], StoredUser::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        stored.into_iter().map(|s| s.open(ring)).collect()
    }

    pub fn update(
        conn: &Connection,
        ring: &KeyRing,
        user: &User,
        expected: Signature,
    ) -> VaultResult<bool> {
        let sealed = SealedPii::seal(user, ring)?;
        let meta = &user.meta;
        let changed = conn.execute(
            "UPDATE users SET display_name = ?, display_name_digest = ?, public_key = ?, \
             public_key_digest = ?, email = ?, email_digest = ?, key_version = ?, password = ?, \
             mtime = ?, signature = ?, status = ?, role = ? \
             WHERE id = ? AND signature = ?",
            params![
                sealed.display_name.ciphertext,
                sealed.display_name.digest,
                sealed.public_key.ciphertext,
                sealed.public_key.digest,
                sealed.email.ciphertext,
                sealed.email.digest,
                user.key_version,
                user.password(),
                meta.mtime,
                meta.signature,
                meta.status,
                meta.role,
                user.id,
                expected,
            ],
        )?;
        Ok(changed == 1)
    }
}

impl VersionedRecord for User {
    type Id = UserId;

    const ENTITY: &'static str = "User";

    fn id(&self) -> UserId {
        self.id
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    /// Every write re-seals all PII under the current key.
    fn prepare_write(&mut self, ring: &KeyRing) {
        self.key_version = ring.current_version();
    }

    fn load(conn: &Connection, ring: &KeyRing, id: UserId) -> VaultResult<Option<Self>> {
        UserRepository::get(conn, ring, id)
    }

    fn store(&self, conn: &Connection, ring: &KeyRing, expected: Signature) -> VaultResult<bool> {
        UserRepository::update(conn, ring, self, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SymmetricKey;
    use crate::models::{Role, Status};
    use crate::mutator::Mutator;
    use crate::storage::schema;
    use std::collections::HashMap;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::initialize(&conn).unwrap();
        conn
    }

    fn ring() -> KeyRing {
        let v = KeyVersion::new();
        let mut keys = HashMap::new();
        keys.insert(v, SymmetricKey::generate());
        KeyRing::from_keys(keys, v).unwrap()
    }

    fn user(ring: &KeyRing, org: OrgId, email: &str, order: i64) -> User {
        User::from_parts(
            UserId::new(),
            org,
            "Alice".into(),
            format!("pk-{}", email),
            email.into(),
            ring.current_version(),
            "$argon2id$x".into(),
            Mutator::initial(order, Status::Active, Role::Normal, 0),
        )
    }

    #[test]
    fn test_pii_encrypted_at_rest() {
        let conn = conn();
        let ring = ring();
        let alice = user(&ring, OrgId::new(), "alice@example.com", 1);
        UserRepository::insert(&conn, &ring, &alice).unwrap();

        let stored_email: String = conn
            .query_row("SELECT email FROM users WHERE id = ?", [alice.id], |r| r.get(0))
            .unwrap();
        assert_ne!(stored_email, "alice@example.com");

        let loaded = UserRepository::get(&conn, &ring, alice.id).unwrap().unwrap();
        assert_eq!(loaded, alice);
    }

    #[test]
    fn test_duplicate_email_in_org_rejected() {
        let conn = conn();
        let ring = ring();
        let org = OrgId::new();
        UserRepository::insert(&conn, &ring, &user(&ring, org, "a@example.com", 1)).unwrap();

        let mut dup = user(&ring, org, "a@example.com", 2);
        dup.set_public_key("pk-other");
        let err = UserRepository::insert(&conn, &ring, &dup).unwrap_err();
        assert!(err.is_unique_violation());

        // Same email in another org is fine.
        let other = user(&ring, OrgId::new(), "a@example.com", 3);
        UserRepository::insert(&conn, &ring, &other).unwrap();
    }

    #[test]
    fn test_duplicate_public_key_in_org_rejected() {
        let conn = conn();
        let ring = ring();
        let org = OrgId::new();
        let first = user(&ring, org, "a@example.com", 1);
        UserRepository::insert(&conn, &ring, &first).unwrap();

        let mut dup = user(&ring, org, "b@example.com", 2);
        dup.set_public_key(first.public_key());
        assert!(UserRepository::insert(&conn, &ring, &dup)
            .unwrap_err()
            .is_unique_violation());
    }

    #[test]
    fn test_tampered_digest_detected_on_read() {
        let conn = conn();
        let ring = ring();
        let alice = user(&ring, OrgId::new(), "alice@example.com", 1);
        UserRepository::insert(&conn, &ring, &alice).unwrap();

        conn.execute(
            "UPDATE users SET display_name_digest = 'not-a-real-digest' WHERE id = ?",
            [alice.id],
        )
        .unwrap();

        let err = UserRepository::get(&conn, &ring, alice.id).unwrap_err();
        assert!(matches!(err, VaultError::DigestMismatch));
    }

    #[test]
    fn test_unknown_key_version_on_read() {
        let conn = conn();
        let ring = ring();
        let alice = user(&ring, OrgId::new(), "alice@example.com", 1);
        UserRepository::insert(&conn, &ring, &alice).unwrap();

        let err = UserRepository::get(&conn, &super::tests::ring(), alice.id).unwrap_err();
        assert!(matches!(err, VaultError::KeyNotFound(_)));
    }

    #[test]
    fn test_writes_seal_under_current_key() {
        let conn = conn();
        let v1 = KeyVersion::new();
        let v2 = KeyVersion::new();
        let keys = HashMap::from([(v1, SymmetricKey::generate()), (v2, SymmetricKey::generate())]);
        let ring = KeyRing::from_keys(keys, v2).unwrap();

        let mut alice = user(&ring, OrgId::new(), "alice@example.com", 1);
        alice.key_version = v1;
        let err = UserRepository::insert(&conn, &ring, &alice).unwrap_err();
        assert!(matches!(err, VaultError::Encryption(_)));

        alice.prepare_write(&ring);
        UserRepository::insert(&conn, &ring, &alice).unwrap();
        let stored: KeyVersion = conn
            .query_row("SELECT key_version FROM users WHERE id = ?", [alice.id], |r| r.get(0))
            .unwrap();
        assert_eq!(stored, v2);
    }

    #[test]
    fn test_org_of_and_list() {
        let conn = conn();
        let ring = ring();
        let org = OrgId::new();
        let a = user(&ring, org, "a@example.com", 1);
        let b = user(&ring, org, "b@example.com", 2);
        UserRepository::insert(&conn, &ring, &a).unwrap();
        UserRepository::insert(&conn, &ring, &b).unwrap();

        assert_eq!(UserRepository::org_of(&conn, a.id).unwrap(), Some(org));
        assert_eq!(UserRepository::list_by_org(&conn, &ring, org).unwrap(), vec![a, b]);
        assert!(UserRepository::stale_key_versions(&conn, ring.current_version())
            .unwrap()
            .is_empty());
    }
}
