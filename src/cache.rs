use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    api::FleetProvider,
    core::{
        capacity::{Capacities, ModelCapacity},
        snapshot::ModelType,
    },
    prelude::*,
};

/// Model capacities persisted between the runs.
#[derive(Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    models: Vec<ModelCapacity>,
}

#[must_use]
pub struct ModelCache {
    path: PathBuf,
}

impl ModelCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the cache, an unreadable cache is treated as missing.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn read(&self) -> Capacities {
        self.read_fallibly().unwrap_or_else(|error| {
            warn!("failed to read the model cache: {error:#}");
            Capacities::default()
        })
    }

    fn read_fallibly(&self) -> Result<Capacities> {
        if !self.path.is_file() {
            return Ok(Capacities::default());
        }
        let cache: CacheFile = toml::from_slice(&fs::read(&self.path)?)?;
        Ok(cache.models.into_iter().collect())
    }

    #[instrument(skip_all, fields(path = %self.path.display(), n_models = capacities.len()))]
    pub fn write(&self, capacities: &Capacities) -> Result {
        let cache = CacheFile { models: capacities.iter().cloned().collect() };
        fs::write(&self.path, toml::to_string(&cache)?)
            .with_context(|| format!("failed to write `{}`", self.path.display()))?;
        info!("cached the models");
        Ok(())
    }
}

/// Read-through model capacity lookup: the cache first, the API on a miss.
#[must_use]
#[derive(bon::Builder)]
pub struct ModelCatalog<'a> {
    cache: &'a ModelCache,
    provider: &'a dyn FleetProvider,
    model_types: &'a [ModelType],

    /// Ignore the cached models and re-fetch them.
    #[builder(default)]
    refresh: bool,
}

impl ModelCatalog<'_> {
    /// Load the capacities, falling back to whatever is cached if the API fails.
    #[instrument(skip_all, fields(refresh = self.refresh))]
    pub fn load(&self) -> Capacities {
        let cached = self.cache.read();
        if !self.refresh && !cached.is_empty() {
            info!(n_models = cached.len(), "using the cached models");
            return cached;
        }
        match self.provider.get_catalog(self.model_types) {
            Ok(catalog) if !catalog.is_empty() => {
                let capacities: Capacities = catalog.into_iter().collect();
                if let Err(error) = self.cache.write(&capacities) {
                    warn!("failed to save the model cache: {error:#}");
                }
                capacities
            }
            Ok(_) => {
                warn!(n_cached = cached.len(), "the model catalog is empty");
                cached
            }
            Err(error) => {
                warn!(n_cached = cached.len(), "failed to fetch the model catalog: {error:#}");
                cached
            }
        }
    }
}
