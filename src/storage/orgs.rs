//! Org repository

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::record::VersionedRecord;
use crate::crypto::KeyRing;
use crate::error::VaultResult;
use crate::models::{Metadata, Org, OrgId, Signature};

pub struct OrgRepository;

const SELECT: &str = "SELECT id, name, owner, ctime, mtime, insert_order, role, \
                      schema_version, signature, status FROM orgs";

impl OrgRepository {
    pub fn insert(conn: &Connection, org: &Org) -> VaultResult<()> {
        let meta = &org.meta;
        conn.execute(
            "INSERT INTO orgs (id, name, owner, ctime, mtime, insert_order, role, \
             schema_version, signature, status) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                org.id,
                org.name,
                org.owner,
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

    pub fn get(conn: &Connection, id: OrgId) -> VaultResult<Option<Org>> {
        Ok(conn
            .query_row(&format!("{} WHERE id = ?", SELECT), [id], Self::from_row)
            .optional()?)
    }

    pub fn get_by_name(conn: &Connection, name: &str) -> VaultResult<Option<Org>> {
        Ok(conn
            .query_row(&format!("{} WHERE name = ?", SELECT), [name], Self::from_row)
            .optional()?)
    }

    /// All orgs in insertion order
    pub fn list(conn: &Connection) -> VaultResult<Vec<Org>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY insert_order", SELECT))?;
        let orgs = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(orgs)
    }

    pub fn update(conn: &Connection, org: &Org, expected: Signature) -> VaultResult<bool> {
        let meta = &org.meta;
        let changed = conn.execute(
            "UPDATE orgs SET name = ?, owner = ?, mtime = ?, signature = ?, status = ?, role = ? \
             WHERE id = ? AND signature = ?",
            params![
                org.name,
                org.owner,
                meta.mtime,
                meta.signature,
                meta.status,
                meta.role,
                org.id,
                expected,
            ],
        )?;
        Ok(changed == 1)
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Org> {
        Ok(Org {
            id: row.get(0)?,
            name: row.get(1)?,
            owner: row.get(2)?,
            meta: Metadata {
                ctime: row.get(3)?,
                mtime: row.get(4)?,
                insert_order: row.get(5)?,
                role: row.get(6)?,
                schema_version: row.get(7)?,
                signature: row.get(8)?,
                status: row.get(9)?,
            },
        })
    }
}

impl VersionedRecord for Org {
    type Id = OrgId;

    const ENTITY: &'static str = "Org";

    fn id(&self) -> OrgId {
        self.id
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    fn load(conn: &Connection, _ring: &KeyRing, id: OrgId) -> VaultResult<Option<Self>> {
        OrgRepository::get(conn, id)
    }

    fn store(&self, conn: &Connection, _ring: &KeyRing, expected: Signature) -> VaultResult<bool> {
        OrgRepository::update(conn, self, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, Status, UserId};
    use crate::mutator::Mutator;
    use crate::storage::schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::initialize(&conn).unwrap();
        conn
    }

    fn org(name: &str, order: i64) -> Org {
        Org {
            id: OrgId::new(),
            name: name.into(),
            owner: UserId::new(),
            meta: Mutator::initial(order, Status::Active, Role::Normal, 0),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let conn = conn();
        let acme = org("acme", 1);
        OrgRepository::insert(&conn, &acme).unwrap();

        assert_eq!(OrgRepository::get(&conn, acme.id).unwrap(), Some(acme.clone()));
        assert_eq!(OrgRepository::get_by_name(&conn, "acme").unwrap(), Some(acme));
        assert!(OrgRepository::get(&conn, OrgId::new()).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let conn = conn();
        OrgRepository::insert(&conn, &org("acme", 1)).unwrap();
        let err = OrgRepository::insert(&conn, &org("acme", 2)).unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn test_update_guarded_by_signature() {
        let conn = conn();
        let before = org("acme", 1);
        OrgRepository::insert(&conn, &before).unwrap();

        let mut after = before.clone();
        after.meta.status = Status::Inactive;
        Mutator::stamp(&before.meta, &mut after.meta);

        assert!(!OrgRepository::update(&conn, &after, Signature::new()).unwrap());
        assert!(OrgRepository::update(&conn, &after, before.meta.signature()).unwrap());
        assert_eq!(OrgRepository::get(&conn, before.id).unwrap(), Some(after));
    }

    #[test]
    fn test_list_in_insert_order() {
        let conn = conn();
        OrgRepository::insert(&conn, &org("second", 2)).unwrap();
        OrgRepository::insert(&conn, &org("first", 1)).unwrap();
        let names: Vec<_> = OrgRepository::list(&conn)
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
