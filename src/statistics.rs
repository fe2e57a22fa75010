//! Consumption and fleet activity summaries.

use chrono::{DateTime, Local, TimeDelta};
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::{
    core::{event::ConsumptionEvent, reading::Reading, replay::ReplayedEvent, snapshot::CarId},
    quantity::volume::Liters,
};

/// Aggregate of a set of per-event consumptions.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Consumption {
    pub n_events: usize,
    pub total: Liters,
    pub mean: Liters,
    pub median: Liters,
    pub min: Liters,
    pub max: Liters,
}

impl Consumption {
    pub fn try_from_events<'a>(
        events: impl IntoIterator<Item = &'a ConsumptionEvent>,
    ) -> Option<Self> {
        let samples = events
            .into_iter()
            .map(|event| OrderedFloat(event.consumption.0))
            .sorted_unstable()
            .collect_vec();
        let (min, max) = (*samples.first()?, *samples.last()?);
        let total: f64 = samples.iter().map(|sample| sample.0).sum();
        #[expect(clippy::cast_precision_loss)]
        let mean = total / samples.len() as f64;
        Some(Self {
            n_events: samples.len(),
            total: Liters(total),
            mean: Liters(mean),
            median: Liters(median(&samples)),
            min: Liters(min.0),
            max: Liters(max.0),
        })
    }
}

/// Median of the sorted samples, averaging the middle pair for an even count.
fn median(sorted: &[OrderedFloat<f64>]) -> f64 {
    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[middle - 1].0 + sorted[middle].0) / 2.0
    } else {
        sorted[middle].0
    }
}

#[must_use]
pub struct Summary {
    pub overall: Consumption,
    pub since: DateTime<Local>,
    pub until: DateTime<Local>,

    /// Mean time between the readings an event is derived from, when known.
    pub mean_time_diff: Option<TimeDelta>,
}

impl Summary {
    pub fn try_from_events(events: &[ConsumptionEvent]) -> Option<Self> {
        let overall = Consumption::try_from_events(events)?;
        let (since, until) = events
            .iter()
            .map(|event| event.timestamp)
            .minmax()
            .into_option()?;
        Some(Self { overall, since, until, mean_time_diff: None })
    }

    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.until - self.since
    }

    /// Average consumption rate over the covered period.
    #[must_use]
    pub fn liters_per_hour(&self) -> Option<f64> {
        let hours = self.duration().as_seconds_f64() / 3600.0;
        (hours > 0.0).then(|| self.overall.total.0 / hours)
    }
}

/// Breakdown by the car name, the largest total consumption first.
pub fn by_car_name(events: &[ConsumptionEvent]) -> Vec<(String, Consumption)> {
    events
        .iter()
        .into_group_map_by(|event| event.car_name.clone())
        .into_iter()
        .filter_map(|(car_name, events)| Some((car_name, Consumption::try_from_events(events)?)))
        .sorted_by(|(lhs_name, lhs), (rhs_name, rhs)| {
            rhs.total.cmp(&lhs.total).then_with(|| lhs_name.cmp(rhs_name))
        })
        .collect()
}

/// Breakdown by the model type, ordered by the type.
pub fn by_model_type(events: &[ConsumptionEvent]) -> Vec<(String, Consumption)> {
    events
        .iter()
        .into_group_map_by(|event| event.model_type)
        .into_iter()
        .sorted_by_key(|(model_type, _)| *model_type)
        .filter_map(|(model_type, events)| {
            Some((format!("Type {model_type}"), Consumption::try_from_events(events)?))
        })
        .collect()
}

/// Mean time between the two readings of the replayed consumption events.
pub fn mean_time_diff(events: &[ReplayedEvent]) -> Option<TimeDelta> {
    let n_events = i32::try_from(events.len()).ok().filter(|n_events| *n_events != 0)?;
    Some(events.iter().map(ReplayedEvent::time_diff).sum::<TimeDelta>() / n_events)
}

#[expect(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    numerator as f64 / denominator as f64
}

/// Fleet activity as seen in the readings log.
#[must_use]
pub struct Activity {
    pub n_readings: usize,
    pub n_cars: usize,
    pub since: DateTime<Local>,
    pub until: DateTime<Local>,
    pub n_available: usize,

    /// The most frequently seen car names first.
    pub per_name: Vec<NameActivity>,

    /// The most tracked cars first.
    pub per_car: Vec<CarActivity>,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameActivity {
    pub car_name: String,
    pub n_readings: usize,
    pub n_available: usize,
}

impl NameActivity {
    #[must_use]
    pub fn availability_rate(&self) -> f64 {
        ratio(self.n_available, self.n_readings)
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarActivity {
    pub car_id: CarId,
    pub car_name: String,
    pub n_readings: usize,
}

impl Activity {
    pub fn try_from_readings(readings: &[Reading]) -> Option<Self> {
        let (since, until) =
            readings.iter().map(|reading| reading.timestamp).minmax().into_option()?;
        let per_name = readings
            .iter()
            .into_group_map_by(|reading| reading.car_name.clone())
            .into_iter()
            .map(|(car_name, readings)| NameActivity {
                car_name,
                n_readings: readings.len(),
                n_available: readings.iter().filter(|reading| reading.available).count(),
            })
            .sorted_by(|lhs, rhs| {
                rhs.n_readings.cmp(&lhs.n_readings).then_with(|| lhs.car_name.cmp(&rhs.car_name))
            })
            .collect();
        let per_car = readings
            .iter()
            .counts_by(|reading| (reading.car_id, reading.car_name.clone()))
            .into_iter()
            .map(|((car_id, car_name), n_readings)| CarActivity { car_id, car_name, n_readings })
            .sorted_by(|lhs, rhs| {
                rhs.n_readings
                    .cmp(&lhs.n_readings)
                    .then_with(|| (lhs.car_id, &lhs.car_name).cmp(&(rhs.car_id, &rhs.car_name)))
            })
            .collect();
        Some(Self {
            n_readings: readings.len(),
            n_cars: readings.iter().map(|reading| reading.car_id).unique().count(),
            since,
            until,
            n_available: readings.iter().filter(|reading| reading.available).count(),
            per_name,
            per_car,
        })
    }

    #[must_use]
    pub fn availability_rate(&self) -> f64 {
        ratio(self.n_available, self.n_readings)
    }
}
