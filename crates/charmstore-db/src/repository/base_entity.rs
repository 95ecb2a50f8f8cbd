//! Repository for base entities (one row per owner/name pair).

use diesel::prelude::*;
use serde_json::Value;

use crate::{
    models::{BaseEntity, NewBaseEntity},
    schema::base_entities,
};

/// Repository for base entity operations.
pub struct BaseEntityRepository;

impl BaseEntityRepository {
    /// Finds the base entity for `(owner, name)`.
    pub fn find(
        conn: &mut SqliteConnection,
        owner: &str,
        name: &str,
    ) -> QueryResult<Option<BaseEntity>> {
        base_entities::table
            .filter(base_entities::owner.eq(owner))
            .filter(base_entities::name.eq(name))
            .select(BaseEntity::as_select())
            .first(conn)
            .optional()
    }

    /// Inserts a new base entity and returns the inserted ID.
    pub fn insert(conn: &mut SqliteConnection, base: &NewBaseEntity) -> QueryResult<i32> {
        diesel::insert_into(base_entities::table)
            .values(base)
            .returning(base_entities::id)
            .get_result(conn)
    }

    /// Replaces the read ACL of a base entity.
    pub fn set_read_acl(conn: &mut SqliteConnection, id: i32, acl: Value) -> QueryResult<usize> {
        diesel::update(base_entities::table.filter(base_entities::id.eq(id)))
            .set(base_entities::read_acl.eq(acl))
            .execute(conn)
    }
}
