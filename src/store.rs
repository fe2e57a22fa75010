//! Persistence seams: the fleet state is loaded and saved whole, logs are append-only.

pub mod csv;

use crate::{core::state::VehicleStates, prelude::*};

pub trait StateStore {
    fn load_all(&self) -> Result<VehicleStates>;

    /// Replace the entire persisted state.
    fn save_all(&self, states: &VehicleStates) -> Result;
}

pub trait AppendLog<T> {
    fn append_all(&self, records: &[T]) -> Result;

    fn read_all(&self) -> Result<Vec<T>>;
}
