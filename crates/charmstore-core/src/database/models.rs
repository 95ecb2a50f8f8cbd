//! Catalog models built from database rows.

use serde_json::{Map, Value};

use crate::reference::Reference;

fn row_reference(owner: String, name: String, series: String, revision: i32) -> Reference {
    Reference {
        user: (!owner.is_empty()).then_some(owner),
        name,
        series: Some(series),
        revision: Some(revision as u32),
    }
}

/// A published, fully-qualified entity.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: u64,
    pub reference: Reference,
    /// Hex blake3 sum of the archive.
    pub blob_hash: String,
    pub blob_size: u64,
    /// RFC 3339 upload timestamp.
    pub upload_time: String,
    pub extra_info: Map<String, Value>,
    pub downloads: u64,
}

impl From<charmstore_db::models::Entity> for Entity {
    fn from(row: charmstore_db::models::Entity) -> Self {
        let extra_info = match row.extra_info {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        Self {
            id: row.id as u64,
            reference: row_reference(row.owner, row.name, row.series, row.revision),
            blob_hash: row.blob_hash,
            blob_size: row.blob_size as u64,
            upload_time: row.upload_time,
            extra_info,
            downloads: row.downloads as u64,
        }
    }
}

impl From<charmstore_db::models::EntityId> for Reference {
    fn from(row: charmstore_db::models::EntityId) -> Self {
        row_reference(row.owner, row.name, row.series, row.revision)
    }
}

/// The record shared by every revision of a base identity.
#[derive(Debug, Clone)]
pub struct BaseEntity {
    pub id: u64,
    pub reference: Reference,
    pub read_acl: Vec<String>,
    pub created_at: String,
}

impl From<charmstore_db::models::BaseEntity> for BaseEntity {
    fn from(row: charmstore_db::models::BaseEntity) -> Self {
        let read_acl = row.read_acl();
        Self {
            id: row.id as u64,
            reference: Reference {
                user: (!row.owner.is_empty()).then_some(row.owner),
                name: row.name,
                series: None,
                revision: None,
            },
            read_acl,
            created_at: row.created_at,
        }
    }
}
