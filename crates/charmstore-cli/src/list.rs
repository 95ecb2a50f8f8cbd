use charmstore_api::{list, ApiContext};
use charmstore_core::{database::store::ListFilter, CatalogResult};
use nu_ansi_term::Color::{Blue, Cyan, Magenta};
use tabled::{
    builder::Builder,
    settings::{themes::BorderCorrection, Panel, Style},
};
use tracing::info;

use crate::utils::{format_bytes, Colored};

pub fn list_entities(ctx: &ApiContext, filter: ListFilter<'_>) -> CatalogResult<()> {
    let result = list::list_entities(ctx, filter)?;

    if result.entries.is_empty() {
        info!("No entities found");
        return Ok(());
    }

    let mut builder = Builder::new();
    builder.push_record(["Id", "Size", "Uploaded", "Downloads"].map(String::from));
    for entry in &result.entries {
        builder.push_record([
            format!("{}", Colored(Cyan, &entry.id)),
            format!("{}", Colored(Magenta, format_bytes(entry.size))),
            entry.upload_time.clone(),
            format!("{}", Colored(Blue, entry.downloads)),
        ]);
    }

    let table = builder
        .build()
        .with(Panel::header(format!(
            "Entities ({} of {})",
            result.entries.len(),
            result.total
        )))
        .with(Style::rounded())
        .with(BorderCorrection {})
        .to_string();

    info!("\n{table}");
    Ok(())
}
