use std::sync::{Arc, OnceLock};

use charmstore_config::config::Config;
use charmstore_core::{
    database::store::CatalogStore, preference::SeriesPreference, resolve::Resolver, CatalogResult,
};
use tracing::debug;

/// Shared state for catalog operations: configuration and a lazily opened
/// store.
#[derive(Clone)]
pub struct ApiContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: Config,
    preference: SeriesPreference,
    store: OnceLock<CatalogStore>,
}

impl ApiContext {
    pub fn new(config: Config) -> Self {
        Self::build(config, OnceLock::new())
    }

    /// Builds a context around an already opened store.
    pub fn with_store(config: Config, store: CatalogStore) -> Self {
        Self::build(config, OnceLock::from(store))
    }

    fn build(config: Config, store: OnceLock<CatalogStore>) -> Self {
        let preference = SeriesPreference::from_config(&config);
        Self {
            inner: Arc::new(ContextInner {
                config,
                preference,
                store,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn preference(&self) -> &SeriesPreference {
        &self.inner.preference
    }

    /// The catalog store, opened on first use.
    pub fn store(&self) -> CatalogResult<&CatalogStore> {
        if let Some(store) = self.inner.store.get() {
            return Ok(store);
        }

        let path = self.inner.config.get_db_path()?;
        debug!(path = %path.display(), "opening catalog store");
        let store = CatalogStore::open(&path)?;

        // another thread may have won the race; either store is usable
        let _ = self.inner.store.set(store);
        self.inner
            .store
            .get()
            .ok_or(charmstore_core::error::CatalogError::PoisonError)
    }

    pub fn resolver(&self) -> CatalogResult<Resolver<&CatalogStore>> {
        Ok(Resolver::new(self.store()?, self.inner.preference.clone()))
    }
}
