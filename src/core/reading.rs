use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        capacity::Capacities,
        snapshot::{CarId, ModelType, VehicleSnapshot},
    },
    prelude::*,
    quantity::{percent::Percent, volume::Liters},
};

/// Vehicle observation with the fuel level resolved to liters.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Local>,
    pub car_id: CarId,
    pub car_name: String,
    pub model_type: ModelType,

    #[serde(rename = "fuel_percent")]
    pub fuel_percent: Percent,

    #[serde(rename = "fuel_liters")]
    pub fuel: Liters,

    pub available: bool,

    #[serde(default)]
    pub location: Option<String>,
}

impl Reading {
    /// Convert the snapshot fuel level into liters.
    ///
    /// Returns [`None`] when the model capacity is unknown or the fuel level is out of range.
    pub fn resolve(snapshot: VehicleSnapshot, capacities: &Capacities) -> Option<Self> {
        if !snapshot.fuel.is_valid() {
            debug!(car_id = %snapshot.car_id, fuel = ?snapshot.fuel, "invalid fuel level, skipping");
            return None;
        }
        let Some(capacity) = capacities.get(snapshot.model_id) else {
            debug!(car_id = %snapshot.car_id, model_id = %snapshot.model_id, "unknown model, skipping");
            return None;
        };
        Some(Self {
            timestamp: snapshot.timestamp,
            car_id: snapshot.car_id,
            car_name: snapshot.car_name,
            model_type: snapshot.model_type,
            fuel_percent: snapshot.fuel,
            fuel: snapshot.fuel * capacity.max_fuel,
            available: snapshot.available,
            location: snapshot.location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{capacity::ModelCapacity, snapshot::ModelId};

    fn capacities() -> Capacities {
        [ModelCapacity {
            model_id: ModelId(7),
            model_name: "Toyota Yaris".to_string(),
            max_fuel: Liters(50.0),
        }]
        .into_iter()
        .collect()
    }

    fn snapshot(model_id: u64, fuel: f64) -> VehicleSnapshot {
        VehicleSnapshot {
            car_id: CarId(1),
            car_name: "Toyota Yaris".to_string(),
            model_id: ModelId(model_id),
            model_type: ModelType(1),
            fuel: Percent(fuel),
            available: true,
            location: Some("Wrocław, Rynek".to_string()),
            timestamp: Local::now(),
        }
    }

    #[test]
    fn resolves_known_model() {
        let reading = Reading::resolve(snapshot(7, 56.0), &capacities()).unwrap();
        assert_eq!(reading.fuel, Liters(28.0));
        assert_eq!(reading.fuel_percent, Percent(56.0));
        assert_eq!(reading.location.as_deref(), Some("Wrocław, Rynek"));
    }

    #[test]
    fn skips_unknown_model() {
        assert!(Reading::resolve(snapshot(8, 56.0), &capacities()).is_none());
    }

    #[test]
    fn skips_out_of_range_fuel() {
        assert!(Reading::resolve(snapshot(7, 120.0), &capacities()).is_none());
    }
}
