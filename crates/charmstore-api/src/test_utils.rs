use charmstore_config::config::Config;
use charmstore_core::{database::store::CatalogStore, reference::Reference};
use charmstore_utils::hash::ArchiveDigest;
use serde_json::Map;

use crate::ApiContext;

pub fn digest() -> ArchiveDigest {
    ArchiveDigest {
        sum: "dc5a4edb8240b018124052c330270696f96771a63b45250a5c17d3000e823355".into(),
        size: 12,
    }
}

pub fn publish(ctx: &ApiContext, id: &str, acl: &[&str]) {
    let acl: Vec<String> = acl.iter().map(|s| s.to_string()).collect();
    ctx.store()
        .unwrap()
        .publish(&Reference::parse(id).unwrap(), &digest(), Map::new(), &acl)
        .unwrap();
}

/// Context over an in-memory store holding the wordpress fixtures plus a
/// private package owned by carol.
pub fn wordpress_context() -> ApiContext {
    let ctx = ApiContext::with_store(
        Config::default_config(),
        CatalogStore::open_in_memory().unwrap(),
    );
    for id in [
        "precise/wordpress-23",
        "precise/wordpress-24",
        "trusty/wordpress-24",
        "trusty/wordpress-25",
        "utopic/wordpress-10",
        "bundle/wordpress-10",
    ] {
        publish(&ctx, id, &["everyone"]);
    }
    publish(&ctx, "~carol/trusty/secret-1", &["alice"]);
    ctx
}
