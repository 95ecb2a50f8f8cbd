use charmstore_core::{
    auth::{check_read, Identity},
    error::CatalogError,
    reference::Reference,
    revision_info::revision_info,
    CatalogResult,
};
use tracing::debug;

use crate::{ApiContext, ResolveOutcome};

fn resolve_one(ctx: &ApiContext, input: &str) -> CatalogResult<Reference> {
    let reference = Reference::parse(input)?;
    ctx.resolver()?.resolve(&reference)
}

/// Resolves each input independently, each on its own blocking worker.
///
/// Outcomes are returned in input order; one failure does not affect the
/// others.
pub async fn resolve_references(ctx: &ApiContext, inputs: &[String]) -> Vec<ResolveOutcome> {
    debug!(count = inputs.len(), "resolving references");

    let handles: Vec<_> = inputs
        .iter()
        .cloned()
        .map(|input| {
            let ctx = ctx.clone();
            let task_input = input.clone();
            let handle = tokio::task::spawn_blocking(move || resolve_one(&ctx, &task_input));
            (input, handle)
        })
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for (input, handle) in handles {
        let result = handle.await.unwrap_or_else(|err| {
            Err(CatalogError::Database(format!("resolve worker failed: {err}")))
        });
        outcomes.push(ResolveOutcome { input, result });
    }
    outcomes
}

/// Resolves `input` and lists the revisions of its series, newest first.
pub fn revision_history(
    ctx: &ApiContext,
    input: &str,
    identity: &Identity,
) -> CatalogResult<Vec<Reference>> {
    let id = resolve_one(ctx, input)?;
    let base = ctx.store()?.base_entity(&id)?;
    check_read(&base.read_acl, &id, identity)?;
    revision_info(ctx.store()?, &id)
}
