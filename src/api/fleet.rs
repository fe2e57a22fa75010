//! Car-sharing fleet API client.

mod models;

use std::time::Duration;

use chrono::Local;
use http::Uri;
use ureq::Agent;

use self::models::{CarModels, CarsResponse};
use crate::{
    api::FleetProvider,
    core::{
        capacity::ModelCapacity,
        snapshot::{ModelType, VehicleSnapshot},
    },
    prelude::*,
};

pub struct Api {
    client: Agent,
    base_url: String,
    zone_id: u32,
}

impl Api {
    pub fn new(base_url: &Uri, zone_id: u32, timeout: Duration) -> Self {
        let client = Agent::config_builder().timeout_global(Some(timeout)).build().into();
        let base_url = base_url.to_string().trim_end_matches('/').to_string();
        Self { client, base_url, zone_id }
    }
}

impl FleetProvider for Api {
    #[instrument(skip_all, fields(zone_id = self.zone_id))]
    fn get_snapshot(&self) -> Result<Vec<VehicleSnapshot>> {
        let url = format!("{}/cars", self.base_url);
        info!(%url, "fetching the fleet…");
        let cars = self
            .client
            .get(&url)
            .query("zoneId", self.zone_id.to_string())
            .call()
            .with_context(|| format!("failed to request the fleet from `{url}`"))?
            .body_mut()
            .read_json::<CarsResponse>()
            .with_context(|| format!("failed to deserialize the fleet from `{url}`"))?
            .cars;
        let n_cars = cars.len();
        let timestamp = Local::now();
        let snapshot: Vec<_> =
            cars.into_iter().filter_map(|car| car.into_snapshot(timestamp)).collect();
        info!(n_cars, n_usable = snapshot.len(), "fetched the fleet");
        Ok(snapshot)
    }

    #[instrument(skip_all, fields(model_type = %model_type))]
    fn get_models(&self, model_type: ModelType) -> Result<Vec<ModelCapacity>> {
        let url = format!("{}/car-models", self.base_url);
        let models = self
            .client
            .get(&url)
            .query("modelType", model_type.to_string())
            .query("electric", "false")
            .call()
            .with_context(|| format!("failed to request the car models from `{url}`"))?
            .body_mut()
            .read_json::<CarModels>()
            .with_context(|| format!("failed to deserialize the car models from `{url}`"))?;
        Ok(Vec::from(models).into_iter().map(ModelCapacity::from).collect())
    }
}
