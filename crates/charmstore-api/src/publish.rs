use std::path::Path;

use charmstore_core::{error::CatalogError, reference::Reference, CatalogResult};
use charmstore_utils::hash::digest_archive;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{ApiContext, PublishReport};

/// Parses `key=value` pairs into an extra-info object.
///
/// Values that parse as JSON are stored as such, anything else as a string.
pub fn parse_extra_info<S: AsRef<str>>(pairs: &[S]) -> CatalogResult<Map<String, Value>> {
    let mut extra = Map::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (key, value) = pair
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| {
                CatalogError::invalid_argument(
                    format!("extra-info {pair:?}"),
                    "expected key=value",
                )
            })?;
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
        extra.insert(key.trim().to_string(), value);
    }
    Ok(extra)
}

/// Publishes the archive at `archive` under `reference`.
///
/// The archive is hashed and sized; its bytes are not copied into the store.
pub fn publish_archive(
    ctx: &ApiContext,
    reference: &str,
    archive: &Path,
    extra_info: Map<String, Value>,
) -> CatalogResult<PublishReport> {
    let reference = Reference::parse(reference)?;
    let digest = digest_archive(archive)?;
    debug!(
        reference = %reference,
        archive = %archive.display(),
        sum = %digest.sum,
        "hashed archive"
    );

    let entity = ctx.store()?.publish(
        &reference,
        &digest,
        extra_info,
        &ctx.config().default_read_acl(),
    )?;

    Ok(PublishReport::from(&entity))
}
