use std::path::Path;

use charmstore_api::{acl, publish, AclGrant, ApiContext};
use charmstore_core::CatalogResult;
use nu_ansi_term::Color::{Blue, Cyan, Green, Magenta};
use tracing::info;

use crate::utils::{format_bytes, Colored};

pub fn publish_archive(
    ctx: &ApiContext,
    reference: &str,
    archive: &str,
    extra: &[String],
) -> CatalogResult<()> {
    let extra_info = publish::parse_extra_info(extra)?;
    let report = publish::publish_archive(ctx, reference, Path::new(archive), extra_info)?;

    info!(
        id = report.id,
        sum = report.sum,
        size = report.size,
        "Published {} ({}) {}",
        Colored(Green, &report.id),
        Colored(Magenta, format_bytes(report.size)),
        Colored(Blue, &report.sum)
    );
    Ok(())
}

pub fn grant(
    ctx: &ApiContext,
    reference: &str,
    users: Vec<String>,
    everyone: bool,
) -> CatalogResult<()> {
    let grant = if everyone {
        AclGrant::Everyone
    } else {
        AclGrant::Users(users)
    };
    let acl = acl::grant_read(ctx, reference, grant)?;

    info!(
        "Read access to {} set to {}",
        Colored(Cyan, reference),
        Colored(Green, acl.join(", "))
    );
    Ok(())
}
