use chrono::{DateTime, Local, TimeDelta};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        event::ConsumptionEvent,
        reading::Reading,
        snapshot::{CarId, ModelType},
    },
    quantity::volume::Liters,
};

/// Consumption between two consecutive readings of the same car.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub struct ReplayedEvent {
    pub event: ConsumptionEvent,
    pub previous_timestamp: DateTime<Local>,
}

impl ReplayedEvent {
    pub fn time_diff(&self) -> TimeDelta {
        self.event.timestamp - self.previous_timestamp
    }
}

/// Re-derive the consumption events from the historical readings.
///
/// Each pair of consecutive readings of a car is compared on its own: decreases below the noise
/// floor are dropped rather than carried over, and a car must have been available in the earlier
/// reading for its decrease to count.
pub fn replay(readings: Vec<Reading>) -> Vec<ReplayedEvent> {
    readings
        .into_iter()
        .sorted_by_key(|reading| (reading.car_id, reading.timestamp))
        .tuple_windows()
        .filter(|(previous, current)| previous.car_id == current.car_id)
        .filter_map(|(previous, current)| consumed_between(&previous, current))
        .collect()
}

fn consumed_between(previous: &Reading, current: Reading) -> Option<ReplayedEvent> {
    if !previous.available {
        return None;
    }
    let consumption = previous.fuel - current.fuel;
    if consumption <= Liters::NOISE_FLOOR {
        return None;
    }
    Some(ReplayedEvent {
        event: ConsumptionEvent {
            timestamp: current.timestamp,
            car_id: current.car_id,
            car_name: current.car_name,
            model_type: current.model_type,
            consumption,
            previous_fuel: previous.fuel,
            current_fuel: current.fuel,
        },
        previous_timestamp: previous.timestamp,
    })
}

/// Flat CSV row of [`ReplayedEvent`].
#[derive(Serialize, Deserialize)]
pub struct ReplayRow {
    timestamp: DateTime<Local>,
    car_id: CarId,
    car_name: String,
    model_type: ModelType,

    #[serde(rename = "consumption_liters")]
    consumption: Liters,

    #[serde(rename = "prev_fuel_liters")]
    previous_fuel: Liters,

    #[serde(rename = "curr_fuel_liters")]
    current_fuel: Liters,

    time_diff_minutes: f64,

    #[serde(rename = "prev_timestamp")]
    previous_timestamp: DateTime<Local>,
}

impl From<&ReplayedEvent> for ReplayRow {
    fn from(replayed: &ReplayedEvent) -> Self {
        let event = &replayed.event;
        Self {
            timestamp: event.timestamp,
            car_id: event.car_id,
            car_name: event.car_name.clone(),
            model_type: event.model_type,
            consumption: event.consumption,
            previous_fuel: event.previous_fuel,
            current_fuel: event.current_fuel,
            time_diff_minutes: replayed.time_diff().as_seconds_f64() / 60.0,
            previous_timestamp: replayed.previous_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::quantity::percent::Percent;

    fn reading(car_id: u64, minute: i64, fuel: f64) -> Reading {
        Reading {
            timestamp: Local.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap()
                + TimeDelta::minutes(minute),
            car_id: CarId(car_id),
            car_name: "Toyota Yaris".to_string(),
            model_type: ModelType(1),
            fuel_percent: Percent(fuel * 2.0),
            fuel: Liters(fuel),
            available: true,
            location: None,
        }
    }

    #[test]
    fn replay_ok() {
        // Deliberately out of order:
        let readings = vec![
            reading(2, 10, 30.0),
            reading(1, 20, 21.5),
            reading(1, 0, 28.0),
            reading(2, 0, 35.0),
            reading(1, 10, 28.0),
            reading(1, 30, 40.0),
            reading(2, 20, 29.95),
        ];
        let events = replay(readings);
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].event.car_id, CarId(1));
        assert_eq!(events[0].event.consumption, Liters(6.5));
        assert_eq!(events[0].event.timestamp, reading(1, 20, 0.0).timestamp);
        assert_eq!(events[0].previous_timestamp, reading(1, 10, 0.0).timestamp);
        assert_eq!(events[0].time_diff(), TimeDelta::minutes(10));

        assert_eq!(events[1].event.car_id, CarId(2));
        assert_eq!(events[1].event.consumption, Liters(5.0));
    }

    #[test]
    fn small_decreases_do_not_add_up() {
        let readings = vec![reading(1, 0, 10.0), reading(1, 10, 9.95), reading(1, 20, 9.88)];
        assert!(replay(readings).is_empty());
    }

    #[test]
    fn unavailable_car_is_not_consuming() {
        let mut rented = reading(1, 10, 20.0);
        rented.available = false;
        let readings = vec![reading(1, 0, 30.0), rented, reading(1, 20, 15.0)];

        let events = replay(readings);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.consumption, Liters(10.0));
        assert_eq!(events[0].event.previous_fuel, Liters(30.0));
    }

    #[test]
    fn readings_of_different_cars_are_not_paired() {
        let readings = vec![reading(1, 0, 40.0), reading(2, 10, 10.0)];
        assert!(replay(readings).is_empty());
    }

    #[test]
    fn row_carries_time_diff() {
        let events = replay(vec![reading(1, 0, 28.0), reading(1, 45, 21.5)]);
        let row = ReplayRow::from(&events[0]);
        assert!((row.time_diff_minutes - 45.0).abs() < f64::EPSILON);
        assert_eq!(row.previous_timestamp, reading(1, 0, 0.0).timestamp);
    }

    #[test]
    fn replay_empty() {
        assert!(replay(Vec::new()).is_empty());
    }
}
