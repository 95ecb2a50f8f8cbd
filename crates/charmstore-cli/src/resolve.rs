use charmstore_api::{resolve, ApiContext};
use charmstore_core::{auth::Identity, error::CatalogError, CatalogResult};
use nu_ansi_term::Color::{Cyan, Green, Red};
use tracing::{error, info};

use crate::utils::Colored;

pub async fn resolve_references(ctx: &ApiContext, references: &[String]) -> CatalogResult<()> {
    let outcomes = resolve::resolve_references(ctx, references).await;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(id) => {
                info!(
                    input = outcome.input,
                    id = %id,
                    "{} {} {}",
                    Colored(Cyan, &outcome.input),
                    Colored(Green, "→"),
                    Colored(Green, id)
                );
            }
            Err(err) => {
                failed += 1;
                error!(
                    input = outcome.input,
                    code = err.kind().code(),
                    "{}: {}",
                    Colored(Red, &outcome.input),
                    err
                );
            }
        }
    }

    if failed > 0 {
        return Err(CatalogError::not_found(
            references.join(" "),
            format!("{failed} of {} references could not be resolved", outcomes.len()),
        ));
    }
    Ok(())
}

pub fn revision_info(ctx: &ApiContext, reference: &str, identity: &Identity) -> CatalogResult<()> {
    let revisions = resolve::revision_history(ctx, reference, identity)?;
    for (idx, id) in revisions.iter().enumerate() {
        let marker = if idx == 0 { "*" } else { " " };
        info!(id = %id, "{} {}", Colored(Green, marker), Colored(Cyan, id));
    }
    Ok(())
}
