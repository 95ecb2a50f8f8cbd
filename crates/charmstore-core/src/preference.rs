//! Preference ordering between candidate references.

use std::{cmp::Ordering, collections::HashSet};

use charmstore_config::config::{Config, BUNDLE_SERIES};

use crate::reference::Reference;

/// Decides which of two candidates sharing a base identity should be served.
///
/// Rules, first decisive one wins:
/// 1. Within a series, the higher revision.
/// 2. Any charm series over the `bundle` pseudo-series.
/// 3. An LTS series over a non-LTS one.
/// 4. The lexically greater series name.
#[derive(Debug, Clone, Default)]
pub struct SeriesPreference {
    lts: HashSet<String>,
}

impl SeriesPreference {
    pub fn new<I, S>(lts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lts: lts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            lts: config.lts_set(),
        }
    }

    pub fn is_lts(&self, series: &str) -> bool {
        self.lts.contains(series)
    }

    /// Returns true iff `a` should be chosen over `b`.
    pub fn is_preferred(&self, a: &Reference, b: &Reference) -> bool {
        let a_series = a.series.as_deref().unwrap_or_default();
        let b_series = b.series.as_deref().unwrap_or_default();

        if a_series == b_series {
            return a.revision > b.revision;
        }

        let a_bundle = a_series == BUNDLE_SERIES;
        let b_bundle = b_series == BUNDLE_SERIES;
        if a_bundle != b_bundle {
            return b_bundle;
        }

        let a_lts = self.is_lts(a_series);
        let b_lts = self.is_lts(b_series);
        if a_lts != b_lts {
            return a_lts;
        }

        a_series > b_series
    }

    /// Ordering with preferred candidates first.
    pub fn compare(&self, a: &Reference, b: &Reference) -> Ordering {
        if self.is_preferred(a, b) {
            Ordering::Less
        } else if self.is_preferred(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    /// Picks the most preferred candidate, or `None` for an empty slice.
    pub fn select_best<'a>(&self, candidates: &'a [Reference]) -> Option<&'a Reference> {
        let mut iter = candidates.iter();
        let mut best = iter.next()?;
        for candidate in iter {
            if self.is_preferred(candidate, best) {
                best = candidate;
            }
        }
        Some(best)
    }

    /// Sorts candidates most preferred first.
    pub fn sort(&self, candidates: &mut [Reference]) {
        candidates.sort_by(|a, b| self.compare(a, b));
    }
}
