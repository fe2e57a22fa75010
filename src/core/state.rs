use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::{core::snapshot::CarId, quantity::volume::Liters};

/// Last known fuel level of a vehicle.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleState {
    pub car_name: String,
    pub fuel: Liters,
    pub timestamp: DateTime<Local>,
}

/// Last known fuel levels of the whole fleet, at most one per car.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, derive_more::IntoIterator)]
pub struct VehicleStates(#[into_iterator(owned, ref)] BTreeMap<CarId, VehicleState>);

impl VehicleStates {
    pub fn get(&self, car_id: CarId) -> Option<&VehicleState> {
        self.0.get(&car_id)
    }

    /// Replace the state and return the previous one.
    pub fn insert(&mut self, car_id: CarId, state: VehicleState) -> Option<VehicleState> {
        self.0.insert(car_id, state)
    }

    pub fn get_mut(&mut self, car_id: CarId) -> Option<&mut VehicleState> {
        self.0.get_mut(&car_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
