use charmstore_core::{database::store::ListFilter, CatalogResult};
use tracing::debug;

use crate::{ApiContext, EntityListEntry, EntityListResult};

/// Lists stored entities, newest first, capped at the configured limit
/// unless `filter` sets its own.
pub fn list_entities(ctx: &ApiContext, filter: ListFilter) -> CatalogResult<EntityListResult> {
    let filter = ListFilter {
        limit: filter.limit.or(Some(ctx.config().list_limit())),
        ..filter
    };
    debug!(filter = ?filter, "listing entities");

    let store = ctx.store()?;
    let entities = store.list(&filter)?;
    let total = store.count()?;

    Ok(EntityListResult {
        entries: entities.iter().map(EntityListEntry::from).collect(),
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::wordpress_context;

    #[test]
    fn test_list_entities() {
        let ctx = wordpress_context();
        let result = list_entities(&ctx, ListFilter::default()).unwrap();
        assert_eq!(result.total, 7);
        assert_eq!(result.entries.len(), 7);
        assert_eq!(result.entries[0].id, "cs:~carol/trusty/secret-1");
    }

    #[test]
    fn test_list_with_filter_and_limit() {
        let ctx = wordpress_context();
        let result = list_entities(
            &ctx,
            ListFilter {
                series: Some("precise"),
                limit: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].id, "cs:precise/wordpress-24");
        assert_eq!(result.total, 7);
    }

    #[test]
    fn test_list_by_user() {
        let ctx = wordpress_context();
        let result = list_entities(
            &ctx,
            ListFilter {
                user: Some("carol"),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(result.entries.len(), 1);
    }
}
