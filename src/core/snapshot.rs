use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::quantity::percent::Percent;

#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct CarId(pub u64);

#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct ModelId(pub u64);

/// Vehicle category as reported by the fleet API.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct ModelType(pub u8);

/// Single vehicle observation taken from the fleet feed.
#[must_use]
#[derive(Clone, Debug)]
pub struct VehicleSnapshot {
    pub car_id: CarId,
    pub car_name: String,
    pub model_id: ModelId,
    pub model_type: ModelType,
    pub fuel: Percent,
    pub available: bool,
    pub location: Option<String>,
    pub timestamp: DateTime<Local>,
}
