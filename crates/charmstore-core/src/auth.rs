//! Read authorization against a base entity's ACL.

use charmstore_config::config::EVERYONE;
use tracing::trace;

use crate::{error::CatalogError, reference::Reference, CatalogResult};

/// Who is making a request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    User(String),
}

impl Identity {
    pub fn from_user(user: Option<String>) -> Self {
        match user {
            Some(user) if !user.is_empty() => Identity::User(user),
            _ => Identity::Anonymous,
        }
    }

    pub fn user(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::User(user) => Some(user),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identity::Anonymous => f.write_str("anonymous"),
            Identity::User(user) => f.write_str(user),
        }
    }
}

/// Checks that `identity` may read `reference` under `acl`.
///
/// The owner of a namespaced package can always read it.
pub fn check_read(acl: &[String], reference: &Reference, identity: &Identity) -> CatalogResult<()> {
    if acl.iter().any(|entry| entry == EVERYONE) {
        return Ok(());
    }

    match identity {
        Identity::Anonymous => {
            Err(CatalogError::Unauthorized(format!(
                "authentication required to read {reference}"
            )))
        }
        Identity::User(user) => {
            let allowed = acl.iter().any(|entry| entry == user)
                || reference.user.as_deref() == Some(user.as_str());
            if allowed {
                trace!(user = %user, reference = %reference, "read access granted");
                Ok(())
            } else {
                Err(CatalogError::Unauthorized(format!(
                    "access denied for user {user:?} to {reference}"
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn acl(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    fn r(s: &str) -> Reference {
        Reference::parse(s).unwrap()
    }

    #[test]
    fn test_everyone_allows_anonymous() {
        let reference = r("trusty/wordpress-25");
        assert!(check_read(&acl(&["everyone"]), &reference, &Identity::Anonymous).is_ok());
        assert!(check_read(&acl(&["everyone"]), &reference, &Identity::User("bob".into())).is_ok());
    }

    #[test]
    fn test_listed_user_allowed() {
        let reference = r("trusty/wordpress-25");
        let result = check_read(&acl(&["alice", "bob"]), &reference, &Identity::User("bob".into()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_owner_allowed() {
        let reference = r("~carol/trusty/secret-1");
        let result = check_read(&acl(&[]), &reference, &Identity::User("carol".into()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_anonymous_denied() {
        let reference = r("~carol/trusty/secret-1");
        let err = check_read(&acl(&["carol"]), &reference, &Identity::Anonymous).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.to_string().contains("authentication required"));
    }

    #[test]
    fn test_other_user_denied() {
        let reference = r("~carol/trusty/secret-1");
        let err = check_read(&acl(&["carol"]), &reference, &Identity::User("mallory".into()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_identity_from_user() {
        assert_eq!(Identity::from_user(None), Identity::Anonymous);
        assert_eq!(Identity::from_user(Some(String::new())), Identity::Anonymous);
        assert_eq!(
            Identity::from_user(Some("bob".into())).user(),
            Some("bob")
        );
    }
}
