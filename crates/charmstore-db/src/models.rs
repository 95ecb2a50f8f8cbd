use diesel::prelude::*;
use serde_json::Value;

use crate::schema::{base_entities, entities};

/// A stored, fully-qualified entity.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = entities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Entity {
    pub id: i32,
    pub base_id: i32,
    pub owner: String,
    pub name: String,
    pub series: String,
    pub revision: i32,
    pub blob_hash: String,
    pub blob_size: i64,
    pub upload_time: String,
    pub extra_info: Option<Value>,
    pub downloads: i64,
}

/// The identifying columns of an entity, used when expanding a base identity.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = entities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EntityId {
    pub owner: String,
    pub name: String,
    pub series: String,
    pub revision: i32,
}

#[derive(Insertable)]
#[diesel(table_name = entities)]
pub struct NewEntity<'a> {
    pub base_id: i32,
    pub owner: &'a str,
    pub name: &'a str,
    pub series: &'a str,
    pub revision: i32,
    pub blob_hash: &'a str,
    pub blob_size: i64,
    pub upload_time: &'a str,
    pub extra_info: Option<Value>,
}

/// Per-package record shared by every series and revision of a base identity.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = base_entities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BaseEntity {
    pub id: i32,
    pub owner: String,
    pub name: String,
    pub read_acl: Value,
    pub created_at: String,
}

impl BaseEntity {
    /// Decodes the stored read ACL. Malformed entries decode as an empty
    /// list, which denies access to everyone but the owner.
    pub fn read_acl(&self) -> Vec<String> {
        serde_json::from_value(self.read_acl.clone()).unwrap_or_default()
    }
}

#[derive(Insertable)]
#[diesel(table_name = base_entities)]
pub struct NewBaseEntity<'a> {
    pub owner: &'a str,
    pub name: &'a str,
    pub read_acl: Value,
    pub created_at: &'a str,
}
