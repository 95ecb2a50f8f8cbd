use charmstore_api::ApiHandler;
use charmstore_core::{auth::Identity, CatalogResult};
use nu_ansi_term::Color::{Red, Yellow};
use tracing::{debug, info, warn};

use crate::utils::Colored;

pub async fn serve_paths(
    handler: &ApiHandler,
    paths: Vec<String>,
    identity: &Identity,
) -> CatalogResult<()> {
    let requests = paths
        .iter()
        .map(|path| (path.clone(), identity.clone()))
        .collect();
    let responses = handler.serve_many(requests).await;

    for (path, response) in paths.iter().zip(responses) {
        debug!(path = path, status = response.status, "served request");
        let body = serde_json::to_string_pretty(&response.body)?;

        if response.is_success() {
            info!("{body}");
        } else {
            let color = if response.status >= 500 { Red } else { Yellow };
            warn!(
                path = path,
                status = response.status,
                "{} {}\n{body}",
                Colored(color, response.status),
                path
            );
        }
    }
    Ok(())
}
