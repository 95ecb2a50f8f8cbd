use charmstore_core::{
    database::models::Entity,
    error::{CatalogError, ErrorKind},
    reference::Reference,
};
use serde::Serialize;
use serde_json::Value;

// ---- Responses ----

/// Outcome of serving one request path.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn from_error(err: &CatalogError) -> Self {
        let kind = err.kind();
        let body = ErrorBody {
            message: err.to_string(),
            code: kind.code(),
        };
        Self {
            status: kind.status_code(),
            body: serde_json::to_value(body).unwrap_or(Value::Null),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorBody {
    pub message: String,
    pub code: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdResponse {
    pub id: String,
    pub user: String,
    pub name: String,
    pub series: String,
    pub revision: u32,
}

impl From<&Reference> for IdResponse {
    fn from(reference: &Reference) -> Self {
        Self {
            id: reference.to_string(),
            user: reference.owner().to_string(),
            name: reference.name.clone(),
            series: reference.series.clone().unwrap_or_default(),
            revision: reference.revision.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RevisionInfoResponse {
    pub revisions: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArchiveSizeResponse {
    pub size: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HashResponse {
    pub sum: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatsResponse {
    pub archive_download_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpandedId {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArchiveResponse {
    pub id: String,
    pub sum: String,
    pub size: u64,
}

// ---- Resolve ----

/// Result of resolving one input reference.
#[derive(Debug)]
pub struct ResolveOutcome {
    pub input: String,
    pub result: Result<Reference, CatalogError>,
}

impl ResolveOutcome {
    pub fn kind(&self) -> Option<ErrorKind> {
        self.result.as_ref().err().map(CatalogError::kind)
    }
}

// ---- Publish ----

/// Report returned after a publish completes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublishReport {
    pub id: String,
    pub sum: String,
    pub size: u64,
    pub upload_time: String,
}

impl From<&Entity> for PublishReport {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.reference.to_string(),
            sum: entity.blob_hash.clone(),
            size: entity.blob_size,
            upload_time: entity.upload_time.clone(),
        }
    }
}

// ---- List ----

/// A single row in an entity listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityListEntry {
    pub id: String,
    pub size: u64,
    pub upload_time: String,
    pub downloads: u64,
}

impl From<&Entity> for EntityListEntry {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.reference.to_string(),
            size: entity.blob_size,
            upload_time: entity.upload_time.clone(),
            downloads: entity.downloads,
        }
    }
}

/// Result of listing stored entities.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityListResult {
    pub entries: Vec<EntityListEntry>,
    pub total: u64,
}

// ---- Grant ----

/// Which read ACL to install.
#[derive(Debug, Clone)]
pub enum AclGrant {
    Everyone,
    Users(Vec<String>),
}
