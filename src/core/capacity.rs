use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{core::snapshot::ModelId, quantity::volume::Liters};

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapacity {
    #[serde(rename = "id")]
    pub model_id: ModelId,

    #[serde(rename = "name")]
    pub model_name: String,

    #[serde(rename = "max_fuel_liters")]
    pub max_fuel: Liters,
}

/// Fuel tank capacities indexed by the model.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Capacities(BTreeMap<ModelId, ModelCapacity>);

impl Capacities {
    pub fn get(&self, model_id: ModelId) -> Option<&ModelCapacity> {
        self.0.get(&model_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelCapacity> {
        self.0.values()
    }
}

impl FromIterator<ModelCapacity> for Capacities {
    fn from_iter<I: IntoIterator<Item = ModelCapacity>>(iter: I) -> Self {
        Self(iter.into_iter().map(|capacity| (capacity.model_id, capacity)).collect())
    }
}
