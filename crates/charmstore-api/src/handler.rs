//! Request path handling.
//!
//! A request path has the form `<reference>/<endpoint>`, for example
//! `trusty/wordpress/meta/id` or `~bob/mysql-3/archive`. Each request is
//! parsed, resolved, authorized against the base entity's read ACL, looked
//! up and finally projected into a JSON body.

use charmstore_core::{
    auth::{check_read, Identity},
    database::store::EntityLookup,
    error::CatalogError,
    reference::Reference,
    resolve::CandidateProvider,
    CatalogResult,
};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    meta::{self, MetaEndpoint},
    ApiContext, ApiResponse, ArchiveResponse, ExpandedId,
};

/// What a request asks of the resolved entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Meta(MetaEndpoint),
    ExpandId,
    Archive,
}

impl Endpoint {
    fn parse(segments: &[&str]) -> Option<Self> {
        match segments {
            ["meta", rest @ ..] => MetaEndpoint::parse(rest).map(Endpoint::Meta),
            ["expand-id"] => Some(Endpoint::ExpandId),
            ["archive"] => Some(Endpoint::Archive),
            _ => None,
        }
    }
}

/// Splits a decoded path into its reference and endpoint.
///
/// A reference spans at most three elements (`~user/series/name`), and
/// package names may themselves be `meta` or `archive`. Split points are
/// tried longest reference first; the first one where both halves parse
/// wins. When no split works, a reference parse error takes precedence over
/// not found.
fn split_path(path: &str, segments: &[String]) -> CatalogResult<(Reference, Endpoint)> {
    let mut reference_error = None;

    for split in (1..segments.len().min(4)).rev() {
        let rest: Vec<&str> = segments[split..].iter().map(String::as_str).collect();
        let Some(endpoint) = Endpoint::parse(&rest) else {
            continue;
        };
        match Reference::parse(&segments[..split].join("/")) {
            Ok(reference) => return Ok((reference, endpoint)),
            Err(err) => {
                reference_error.get_or_insert(err);
            }
        }
    }

    Err(reference_error
        .unwrap_or_else(|| CatalogError::not_found(path, format!("not found: {path:?}"))))
}

/// Serves request paths against a catalog context.
#[derive(Clone)]
pub struct ApiHandler {
    ctx: ApiContext,
}

impl ApiHandler {
    pub fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ApiContext {
        &self.ctx
    }

    /// Serves one request, turning failures into error bodies.
    pub fn serve(&self, path: &str, identity: &Identity) -> ApiResponse {
        match self.handle(path, identity) {
            Ok(body) => ApiResponse::ok(body),
            Err(err) => {
                let response = ApiResponse::from_error(&err);
                if response.status >= 500 {
                    warn!(path = path, error = %err, "request failed");
                } else {
                    debug!(path = path, status = response.status, error = %err, "request rejected");
                }
                response
            }
        }
    }

    /// Serves independent requests concurrently, each on its own blocking
    /// worker. Responses are returned in request order.
    pub async fn serve_many(&self, requests: Vec<(String, Identity)>) -> Vec<ApiResponse> {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|(path, identity)| {
                let handler = self.clone();
                tokio::task::spawn_blocking(move || handler.serve(&path, &identity))
            })
            .collect();

        let mut responses = Vec::with_capacity(handles.len());
        for handle in handles {
            let response = handle.await.unwrap_or_else(|err| {
                ApiResponse::from_error(&CatalogError::Database(format!(
                    "request worker failed: {err}"
                )))
            });
            responses.push(response);
        }
        responses
    }

    /// Serves one request, returning the body or the failure.
    pub fn handle(&self, path: &str, identity: &Identity) -> CatalogResult<Value> {
        let segments = path
            .trim_matches('/')
            .split('/')
            .map(|segment| {
                percent_decode_str(segment)
                    .decode_utf8()
                    .map(|decoded| decoded.into_owned())
                    .map_err(|_| CatalogError::invalid_argument("path", "not valid UTF-8"))
            })
            .collect::<CatalogResult<Vec<String>>>()?;

        let (reference, endpoint) = split_path(path, &segments)?;
        trace!(reference = %reference, endpoint = ?endpoint, "parsed request path");

        let store = self.ctx.store()?;
        let id = self.ctx.resolver()?.resolve(&reference)?;

        let base = store.base_entity(&id)?;
        check_read(&base.read_acl, &id, identity)?;

        let entity = store.find_entity(&id)?;

        match endpoint {
            Endpoint::Meta(meta) => meta::project(&self.ctx, &meta, &id, &entity),
            Endpoint::ExpandId => {
                let mut ids = store.expand_url(&id)?;
                self.ctx.preference().sort(&mut ids);
                let expanded: Vec<ExpandedId> = ids
                    .iter()
                    .map(|id| ExpandedId { id: id.to_string() })
                    .collect();
                Ok(serde_json::to_value(expanded)?)
            }
            Endpoint::Archive => {
                if self.ctx.config().records_downloads() {
                    let count = store.increment_downloads(&entity)?;
                    trace!(id = %id, downloads = count, "recorded archive download");
                }
                Ok(serde_json::to_value(ArchiveResponse {
                    id: id.to_string(),
                    sum: entity.blob_hash,
                    size: entity.blob_size,
                })?)
            }
        }
    }
}
