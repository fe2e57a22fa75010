pub mod fleet;

use crate::{
    core::{
        capacity::ModelCapacity,
        snapshot::{ModelType, VehicleSnapshot},
    },
    prelude::*,
};

/// Source of the fleet snapshot and the model catalog.
pub trait FleetProvider {
    /// Fetch the current fuel levels of the whole zone.
    ///
    /// Vehicles without a usable fuel reading are left out.
    fn get_snapshot(&self) -> Result<Vec<VehicleSnapshot>>;

    /// Fetch the fuel tank capacities of the specified model type.
    fn get_models(&self, model_type: ModelType) -> Result<Vec<ModelCapacity>>;

    /// Fetch the fuel tank capacities of all the specified model types.
    ///
    /// Fails if any of the model types fails.
    #[instrument(skip_all, fields(model_types = ?model_types))]
    fn get_catalog(&self, model_types: &[ModelType]) -> Result<Vec<ModelCapacity>> {
        let mut catalog = Vec::new();
        for model_type in model_types {
            let models = self
                .get_models(*model_type)
                .with_context(|| format!("failed to fetch the models of type {model_type}"))?;
            info!(%model_type, n_models = models.len(), "fetched the models");
            catalog.extend(models);
        }
        Ok(catalog)
    }
}
