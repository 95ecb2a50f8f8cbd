use std::cmp::Reverse;

use tracing::debug;

use crate::{error::CatalogError, reference::Reference, resolve::CandidateProvider, CatalogResult};

/// Lists the revisions published in the same series as `id`, newest first.
///
/// # Errors
///
/// * [`CatalogError::NotFound`] if nothing shares the base identity of `id`,
///   or if nothing was ever published in its series.
pub fn revision_info<P>(provider: &P, id: &Reference) -> CatalogResult<Vec<Reference>>
where
    P: CandidateProvider + ?Sized,
{
    let base = id.base();
    let candidates = provider.expand_url(&base)?;
    if candidates.is_empty() {
        return Err(CatalogError::not_found(
            id.to_string(),
            format!("no entities found for {:?}", base.to_string()),
        ));
    }

    let mut siblings: Vec<Reference> = candidates
        .into_iter()
        .filter(|candidate| candidate.series == id.series)
        .collect();
    siblings.sort_by_key(|candidate| Reverse(candidate.revision));

    if siblings.is_empty() {
        return Err(CatalogError::not_found(
            id.to_string(),
            format!(
                "no revisions found for series {:?} of {:?}",
                id.series.as_deref().unwrap_or_default(),
                base.to_string()
            ),
        ));
    }

    debug!(id = %id, revisions = siblings.len(), "collected revision info");
    Ok(siblings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, resolve::tests::MemoryProvider};

    fn r(s: &str) -> Reference {
        Reference::parse(s).unwrap()
    }

    #[test]
    fn test_same_series_newest_first() {
        let provider = MemoryProvider::wordpress();
        let revisions = revision_info(&provider, &r("trusty/wordpress-25")).unwrap();
        assert_eq!(
            revisions,
            vec![r("trusty/wordpress-25"), r("trusty/wordpress-24")]
        );
    }

    #[test]
    fn test_single_revision_series() {
        let provider = MemoryProvider::wordpress();
        let revisions = revision_info(&provider, &r("bundle/wordpress-10")).unwrap();
        assert_eq!(revisions, vec![r("bundle/wordpress-10")]);
    }

    #[test]
    fn test_unknown_base_identity() {
        let provider = MemoryProvider::wordpress();
        let err = revision_info(&provider, &r("trusty/mysql-1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), r#"no entities found for "cs:mysql""#);
    }

    #[test]
    fn test_unpublished_series() {
        let provider = MemoryProvider::wordpress();
        let err = revision_info(&provider, &r("xenial/wordpress-1")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            err.to_string(),
            r#"no revisions found for series "xenial" of "cs:wordpress""#
        );
    }
}
