use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{
    core::snapshot::{CarId, ModelType},
    quantity::volume::Liters,
};

/// Detected fuel decrease between two consecutive observations of the same car.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionEvent {
    pub timestamp: DateTime<Local>,
    pub car_id: CarId,
    pub car_name: String,
    pub model_type: ModelType,

    #[serde(rename = "consumption_liters")]
    pub consumption: Liters,

    #[serde(rename = "prev_fuel_liters")]
    pub previous_fuel: Liters,

    #[serde(rename = "curr_fuel_liters")]
    pub current_fuel: Liters,
}
