use charmstore_config::config::EVERYONE;
use charmstore_core::{error::CatalogError, reference::Reference, CatalogResult};
use tracing::info;

use crate::{AclGrant, ApiContext};

/// Replaces the read ACL of the package `reference` belongs to.
///
/// Series and revision in `reference` are ignored; the ACL is shared by
/// every revision of the base identity.
pub fn grant_read(ctx: &ApiContext, reference: &str, grant: AclGrant) -> CatalogResult<Vec<String>> {
    let reference = Reference::parse(reference)?;
    let acl = match grant {
        AclGrant::Everyone => vec![EVERYONE.to_string()],
        AclGrant::Users(users) => {
            if users.is_empty() || users.iter().any(|user| user.trim().is_empty()) {
                return Err(CatalogError::invalid_argument(
                    "read ACL",
                    "at least one non-empty user name is required",
                ));
            }
            users
        }
    };

    ctx.store()?.set_read_acl(&reference, &acl)?;
    info!(reference = %reference.base(), acl = ?acl, "read ACL updated");
    Ok(acl)
}

#[cfg(test)]
mod tests {
    use charmstore_core::{auth::Identity, error::ErrorKind};

    use super::*;
    use crate::{test_utils::wordpress_context, ApiHandler};

    #[test]
    fn test_grant_users_then_everyone() {
        let ctx = wordpress_context();
        let handler = ApiHandler::new(ctx.clone());

        grant_read(&ctx, "wordpress", AclGrant::Users(vec!["bob".into()])).unwrap();
        assert_eq!(
            handler.serve("wordpress/meta/id", &Identity::Anonymous).status,
            401
        );
        assert_eq!(
            handler
                .serve("wordpress/meta/id", &Identity::User("bob".into()))
                .status,
            200
        );

        grant_read(&ctx, "trusty/wordpress-25", AclGrant::Everyone).unwrap();
        assert_eq!(
            handler.serve("wordpress/meta/id", &Identity::Anonymous).status,
            200
        );
    }

    #[test]
    fn test_grant_rejects_empty_users() {
        let ctx = wordpress_context();
        let err = grant_read(&ctx, "wordpress", AclGrant::Users(vec![])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_grant_unknown_package() {
        let ctx = wordpress_context();
        let err = grant_read(&ctx, "mysql", AclGrant::Everyone).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
