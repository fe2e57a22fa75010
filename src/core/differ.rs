//! Fuel consumption inference from consecutive observations of the same vehicle.

use crate::{
    core::{
        event::ConsumptionEvent,
        reading::Reading,
        state::{VehicleState, VehicleStates},
    },
    prelude::*,
    quantity::volume::Liters,
};

/// What a new reading means relative to the last known state of the car.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum Observation {
    /// The car has never been seen before.
    Baseline,

    /// Fuel decreased beyond the noise floor.
    Consumption(ConsumptionEvent),

    /// Fuel increased: the car has been refueled.
    Refuel { refilled: Liters },

    /// Fuel is the same within the noise floor.
    Unchanged,
}

/// Compare the reading against the prior state.
pub fn observe(prior: Option<&VehicleState>, reading: &Reading) -> Observation {
    let Some(prior) = prior else {
        return Observation::Baseline;
    };
    let decrease = prior.fuel - reading.fuel;
    if decrease > Liters::NOISE_FLOOR {
        Observation::Consumption(ConsumptionEvent {
            timestamp: reading.timestamp,
            car_id: reading.car_id,
            car_name: reading.car_name.clone(),
            model_type: reading.model_type,
            consumption: decrease,
            previous_fuel: prior.fuel,
            current_fuel: reading.fuel,
        })
    } else if reading.fuel > prior.fuel {
        Observation::Refuel { refilled: reading.fuel - prior.fuel }
    } else {
        Observation::Unchanged
    }
}

/// Applies readings to the fleet state one by one.
#[must_use]
pub struct Differ {
    states: VehicleStates,
}

impl Differ {
    pub const fn new(states: VehicleStates) -> Self {
        Self { states }
    }

    pub fn apply(&mut self, reading: &Reading) -> Observation {
        let observation = observe(self.states.get(reading.car_id), reading);
        match &observation {
            Observation::Baseline => {
                debug!(car_id = %reading.car_id, fuel = ?reading.fuel, "baseline");
                self.states.insert(reading.car_id, Self::state_of(reading));
            }
            Observation::Consumption(event) => {
                info!(
                    car_id = %event.car_id,
                    car_name = %event.car_name,
                    consumption = ?event.consumption,
                    previous = ?event.previous_fuel,
                    current = ?event.current_fuel,
                    "consumed",
                );
                self.states.insert(reading.car_id, Self::state_of(reading));
            }
            Observation::Refuel { refilled } => {
                info!(
                    car_id = %reading.car_id,
                    car_name = %reading.car_name,
                    refilled = ?refilled,
                    "refueled",
                );
                self.states.insert(reading.car_id, Self::state_of(reading));
            }
            Observation::Unchanged => {
                // Keep the fuel level, so that sub-threshold decreases accumulate:
                if let Some(state) = self.states.get_mut(reading.car_id) {
                    state.timestamp = reading.timestamp;
                    state.car_name.clone_from(&reading.car_name);
                }
            }
        }
        observation
    }

    pub const fn states(&self) -> &VehicleStates {
        &self.states
    }

    fn state_of(reading: &Reading) -> VehicleState {
        VehicleState {
            car_name: reading.car_name.clone(),
            fuel: reading.fuel,
            timestamp: reading.timestamp,
        }
    }
}

/// Observation counters of a single run.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Tally {
    pub n_baselines: usize,
    pub n_consumptions: usize,
    pub n_refuels: usize,
    pub n_unchanged: usize,
    pub consumed: Liters,
    pub refilled: Liters,
}

impl Tally {
    pub fn record(&mut self, observation: &Observation) {
        match observation {
            Observation::Baseline => self.n_baselines += 1,
            Observation::Consumption(event) => {
                self.n_consumptions += 1;
                self.consumed += event.consumption;
            }
            Observation::Refuel { refilled } => {
                self.n_refuels += 1;
                self.refilled += *refilled;
            }
            Observation::Unchanged => self.n_unchanged += 1,
        }
    }
}
