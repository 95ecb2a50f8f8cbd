//! Metadata projections served under `<reference>/meta/...`.

use charmstore_core::{
    database::models::Entity, error::CatalogError, reference::Reference,
    revision_info::revision_info, CatalogResult,
};
use serde_json::{json, Value};

use crate::{
    ApiContext, ArchiveSizeResponse, HashResponse, IdResponse, RevisionInfoResponse,
    StatsResponse,
};

/// A metadata endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaEndpoint {
    Id,
    IdUser,
    IdName,
    IdSeries,
    IdRevision,
    RevisionInfo,
    ArchiveSize,
    Hash,
    ExtraInfo,
    ExtraInfoKey(String),
    Stats,
}

impl MetaEndpoint {
    /// Parses the path elements following `meta/`.
    pub fn parse(segments: &[&str]) -> Option<Self> {
        let endpoint = match segments {
            ["id"] => Self::Id,
            ["id-user"] => Self::IdUser,
            ["id-name"] => Self::IdName,
            ["id-series"] => Self::IdSeries,
            ["id-revision"] => Self::IdRevision,
            ["revision-info"] => Self::RevisionInfo,
            ["archive-size"] => Self::ArchiveSize,
            ["hash"] => Self::Hash,
            ["extra-info"] => Self::ExtraInfo,
            ["extra-info", key @ ..] if !key.is_empty() && key.iter().all(|k| !k.is_empty()) => {
                Self::ExtraInfoKey(key.join("/"))
            }
            ["stats"] => Self::Stats,
            _ => return None,
        };
        Some(endpoint)
    }
}

/// Projects `entity`, stored under the resolved `id`, through `endpoint`.
pub fn project(
    ctx: &ApiContext,
    endpoint: &MetaEndpoint,
    id: &Reference,
    entity: &Entity,
) -> CatalogResult<Value> {
    let value = match endpoint {
        MetaEndpoint::Id => serde_json::to_value(IdResponse::from(id))?,
        MetaEndpoint::IdUser => json!({ "User": id.owner() }),
        MetaEndpoint::IdName => json!({ "Name": id.name }),
        MetaEndpoint::IdSeries => json!({ "Series": id.series.as_deref().unwrap_or_default() }),
        MetaEndpoint::IdRevision => json!({ "Revision": id.revision.unwrap_or_default() }),
        MetaEndpoint::RevisionInfo => {
            let revisions = revision_info(ctx.store()?, id)?;
            serde_json::to_value(RevisionInfoResponse {
                revisions: revisions.iter().map(ToString::to_string).collect(),
            })?
        }
        MetaEndpoint::ArchiveSize => {
            serde_json::to_value(ArchiveSizeResponse {
                size: entity.blob_size,
            })?
        }
        MetaEndpoint::Hash => {
            serde_json::to_value(HashResponse {
                sum: entity.blob_hash.clone(),
            })?
        }
        MetaEndpoint::ExtraInfo => Value::Object(entity.extra_info.clone()),
        MetaEndpoint::ExtraInfoKey(key) => {
            entity.extra_info.get(key).cloned().ok_or_else(|| {
                CatalogError::not_found(
                    id.to_string(),
                    format!("extra-info key {key:?} not found for {id}"),
                )
            })?
        }
        MetaEndpoint::Stats => {
            serde_json::to_value(StatsResponse {
                archive_download_count: entity.downloads,
            })?
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoints() {
        assert_eq!(MetaEndpoint::parse(&["id"]), Some(MetaEndpoint::Id));
        assert_eq!(
            MetaEndpoint::parse(&["revision-info"]),
            Some(MetaEndpoint::RevisionInfo)
        );
        assert_eq!(
            MetaEndpoint::parse(&["extra-info", "vcs", "branch"]),
            Some(MetaEndpoint::ExtraInfoKey("vcs/branch".into()))
        );
        assert_eq!(MetaEndpoint::parse(&["extra-info", ""]), None);
        assert_eq!(MetaEndpoint::parse(&["any"]), None);
        assert_eq!(MetaEndpoint::parse(&[]), None);
    }
}
