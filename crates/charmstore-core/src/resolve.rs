//! Resolution of partial references to a single stored revision.

use tracing::{debug, trace};

use crate::{
    error::CatalogError, preference::SeriesPreference, reference::Reference, CatalogResult,
};

/// Source of candidate references for a base identity.
pub trait CandidateProvider {
    /// Every stored reference sharing the user and name of `base`, whatever
    /// its series and revision. Empty when nothing matches; errors only on
    /// infrastructure failure.
    fn expand_url(&self, base: &Reference) -> CatalogResult<Vec<Reference>>;
}

impl<P: CandidateProvider + ?Sized> CandidateProvider for &P {
    fn expand_url(&self, base: &Reference) -> CatalogResult<Vec<Reference>> {
        (**self).expand_url(base)
    }
}

/// Turns partial references into fully-qualified ones.
pub struct Resolver<P> {
    provider: P,
    preference: SeriesPreference,
}

impl<P: CandidateProvider> Resolver<P> {
    pub fn new(provider: P, preference: SeriesPreference) -> Self {
        Self {
            provider,
            preference,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn preference(&self) -> &SeriesPreference {
        &self.preference
    }

    /// Resolves `reference` to the best stored match.
    ///
    /// A reference that already names both series and revision is returned
    /// unchanged without consulting the provider, so its existence is not
    /// checked here. Otherwise candidates are drawn from the base identity
    /// and narrowed to the series or revision the reference does name.
    ///
    /// # Errors
    ///
    /// * [`CatalogError::NotFound`] if no stored entity matches.
    /// * Any provider failure, unchanged.
    pub fn resolve(&self, reference: &Reference) -> CatalogResult<Reference> {
        if reference.is_fully_qualified() {
            trace!(reference = %reference, "already fully qualified");
            return Ok(reference.clone());
        }

        let candidates: Vec<Reference> = self
            .provider
            .expand_url(&reference.base())?
            .into_iter()
            .filter(|candidate| matches_partial(reference, candidate))
            .collect();
        let best = self
            .preference
            .select_best(&candidates)
            .ok_or_else(|| {
                CatalogError::not_found(
                    reference.to_string(),
                    format!("no matching package for {:?}", reference.to_string()),
                )
            })?;

        debug!(
            reference = %reference,
            resolved = %best,
            candidates = candidates.len(),
            "resolved reference"
        );
        Ok(best.clone())
    }
}

/// Whether `candidate` agrees with every part `partial` specifies.
fn matches_partial(partial: &Reference, candidate: &Reference) -> bool {
    partial
        .series
        .as_ref()
        .is_none_or(|series| candidate.series.as_ref() == Some(series))
        && partial
            .revision
            .is_none_or(|revision| candidate.revision == Some(revision))
}
