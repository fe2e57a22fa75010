use std::ops::{Mul, RangeInclusive};

use crate::quantity::volume::Liters;

quantity!(Percent, f64, "%");

impl Percent {
    const VALID_RANGE: RangeInclusive<f64> = 0.0..=100.0;

    /// Whether the reading is a sane fuel level.
    #[must_use]
    pub fn is_valid(self) -> bool {
        Self::VALID_RANGE.contains(&self.0)
    }
}

impl Mul<Liters> for Percent {
    type Output = Liters;

    /// Take the percentage of the capacity.
    ///
    /// Multiplies before dividing, so that whole percentages of whole capacities stay exact.
    fn mul(self, capacity: Liters) -> Self::Output {
        Liters(self.0 * capacity.0 / 100.0)
    }
}
