use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{
    core::{
        capacity::ModelCapacity,
        snapshot::{CarId, ModelId, ModelType, VehicleSnapshot},
    },
    prelude::*,
    quantity::{percent::Percent, volume::Liters},
};

#[serde_as]
#[derive(Deserialize)]
pub struct CarsResponse {
    /// Cars with malformed identifiers are dropped, not the entire response.
    #[serde_as(as = "serde_with::VecSkipError<_>")]
    pub cars: Vec<Car>,
}

#[serde_as]
#[derive(Deserialize)]
pub struct Car {
    pub id: CarId,

    #[serde(rename = "model", default)]
    pub name: String,

    #[serde(rename = "modelId")]
    pub model_id: ModelId,

    #[serde(rename = "modelType")]
    pub model_type: ModelType,

    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub fuel: Option<Percent>,

    #[serde(default)]
    pub available: bool,

    /// Free-form location, anything but a string is dropped.
    #[serde_as(as = "serde_with::DefaultOnError")]
    #[serde(default)]
    pub location: Option<String>,
}

impl Car {
    pub fn into_snapshot(self, timestamp: DateTime<Local>) -> Option<VehicleSnapshot> {
        let Some(fuel) = self.fuel else {
            debug!(car_id = %self.id, "missing fuel level, skipping");
            return None;
        };
        Some(VehicleSnapshot {
            car_id: self.id,
            car_name: self.name,
            model_id: self.model_id,
            model_type: self.model_type,
            fuel,
            available: self.available,
            location: self.location,
            timestamp,
        })
    }
}

/// The catalog comes either as a bare list, or wrapped into an object.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum CarModels {
    Bare(Vec<CarModel>),

    Wrapped {
        #[serde(rename = "carModels")]
        models: Vec<CarModel>,
    },
}

impl From<CarModels> for Vec<CarModel> {
    fn from(models: CarModels) -> Self {
        match models {
            CarModels::Bare(models) | CarModels::Wrapped { models } => models,
        }
    }
}

#[derive(Deserialize)]
pub struct CarModel {
    pub id: ModelId,
    pub name: String,

    #[serde(rename = "maxFuel")]
    pub max_fuel: Liters,
}

impl From<CarModel> for ModelCapacity {
    fn from(model: CarModel) -> Self {
        Self { model_id: model.id, model_name: model.name, max_fuel: model.max_fuel }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;

    #[test]
    fn cars_response_ok() -> Result {
        // language=json
        let body = r#"{
            "cars": [
                {
                    "id": 1021,
                    "model": "Toyota Yaris",
                    "modelId": 7,
                    "modelType": 1,
                    "fuel": 56,
                    "available": true,
                    "location": "Kraków, Rynek Główny",
                    "regNumber": "KR 1234A"
                },
                {
                    "id": 1022,
                    "model": "Toyota Yaris",
                    "modelId": 7,
                    "modelType": 1,
                    "fuel": "unknown",
                    "available": false,
                    "location": {"lat": 50.0614, "lng": 19.9366}
                },
                {
                    "id": 1023,
                    "model": "Renault Trafic",
                    "modelId": 11,
                    "modelType": 2
                },
                {
                    "id": "broken",
                    "modelId": 7,
                    "modelType": 1,
                    "fuel": 20
                }
            ]
        }"#;
        let cars = serde_json::from_str::<CarsResponse>(body)?.cars;
        assert_eq!(cars.len(), 3);
        assert_eq!(cars[0].id, CarId(1021));
        assert_eq!(cars[0].fuel, Some(Percent(56.0)));
        assert!(cars[0].available);
        assert_eq!(cars[0].location.as_deref(), Some("Kraków, Rynek Główny"));
        assert_eq!(cars[1].fuel, None);
        assert_eq!(cars[1].location, None);
        assert_eq!(cars[2].fuel, None);
        assert_eq!(cars[2].model_type, ModelType(2));

        let snapshot: Vec<_> =
            cars.into_iter().filter_map(|car| car.into_snapshot(Local::now())).collect();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].car_name, "Toyota Yaris");
        assert_eq!(snapshot[0].model_id, ModelId(7));
        assert_eq!(snapshot[0].location.as_deref(), Some("Kraków, Rynek Główny"));
        Ok(())
    }

    #[test]
    fn bare_car_models_ok() -> Result {
        // language=json
        let body = r#"[
            {"id": 7, "name": "Toyota Yaris", "maxFuel": 42},
            {"id": 9, "name": "Skoda Fabia", "maxFuel": 45.0}
        ]"#;
        let models = Vec::from(serde_json::from_str::<CarModels>(body)?);
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].max_fuel, Liters(42.0));
        assert_eq!(models[1].name, "Skoda Fabia");
        Ok(())
    }

    #[test]
    fn wrapped_car_models_ok() -> Result {
        // language=json
        let body = r#"{"carModels": [{"id": 11, "name": "Renault Trafic", "maxFuel": 80}]}"#;
        let models = Vec::from(serde_json::from_str::<CarModels>(body)?);
        assert_eq!(models.len(), 1);
        assert_eq!(ModelCapacity::from(models.into_iter().next().unwrap()).max_fuel, Liters(80.0));
        Ok(())
    }
}
