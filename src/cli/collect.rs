use bon::Builder;
use chrono::{DateTime, Local};
use clap::Parser;

use crate::{
    api::FleetProvider,
    cache::{ModelCache, ModelCatalog},
    cli::{api::ApiArgs, data::DataArgs, heartbeat::HeartbeatArgs},
    core::{
        differ::{Differ, Observation, Tally},
        event::ConsumptionEvent,
        reading::Reading,
        snapshot::ModelType,
    },
    prelude::*,
    store::{AppendLog, StateStore},
    tables::build_events_table,
};

#[derive(Parser)]
pub struct CollectArgs {
    #[clap(flatten)]
    api: ApiArgs,

    #[clap(flatten)]
    data: DataArgs,

    /// Re-fetch the model capacities even if they are cached.
    #[clap(long, env = "REFRESH_MODELS")]
    refresh_models: bool,

    /// Do not log every observation into the readings log.
    #[clap(long, env = "NO_READINGS")]
    no_readings: bool,

    #[clap(flatten)]
    heartbeat: HeartbeatArgs,
}

impl CollectArgs {
    pub fn run(&self) -> Result {
        self.data.ensure_exists()?;
        let provider = self.api.new_client();
        let model_cache = self.data.model_cache();
        let state_store = self.data.state_file();
        let consumption_log = self.data.consumption_log();
        let readings_file = self.data.readings_log();
        let readings_log = if self.no_readings {
            None
        } else {
            Some(&readings_file as &dyn AppendLog<Reading>)
        };

        let report = Collector::builder()
            .provider(&provider)
            .model_cache(&model_cache)
            .model_types(&self.api.model_types)
            .refresh_models(self.refresh_models)
            .state_store(&state_store)
            .consumption_log(&consumption_log)
            .maybe_readings_log(readings_log)
            .build()
            .run()?;
        if !report.events.is_empty() {
            println!("{}", build_events_table(&report.events));
        }

        self.heartbeat.send();
        Ok(())
    }
}

/// Result of a single collection run.
pub struct Report {
    pub tally: Tally,
    pub events: Vec<ConsumptionEvent>,
}

/// Single collection run: fetch, diff, persist.
#[derive(Builder)]
pub struct Collector<'a> {
    provider: &'a dyn FleetProvider,
    model_cache: &'a ModelCache,
    model_types: &'a [ModelType],

    #[builder(default)]
    refresh_models: bool,

    state_store: &'a dyn StateStore,
    consumption_log: &'a dyn AppendLog<ConsumptionEvent>,
    readings_log: Option<&'a dyn AppendLog<Reading>>,

    #[builder(default = Local::now())]
    now: DateTime<Local>,
}

impl Collector<'_> {
    #[instrument(skip_all, fields(now = %self.now))]
    pub fn run(self) -> Result<Report> {
        // Nothing is persisted, the model cache included, until the snapshot is in hand:
        let snapshot = self.provider.get_snapshot().context("failed to fetch the fleet")?;
        let n_vehicles = snapshot.len();

        let capacities = ModelCatalog::builder()
            .cache(self.model_cache)
            .provider(self.provider)
            .model_types(self.model_types)
            .refresh(self.refresh_models)
            .build()
            .load();
        if capacities.is_empty() {
            warn!("no model capacities available, all vehicles will be skipped");
        }

        let mut differ = Differ::new(self.state_store.load_all()?);
        let mut tally = Tally::default();
        let mut events = Vec::new();
        let mut readings = Vec::new();
        let mut n_untracked = 0_usize;
        let mut n_unresolved = 0_usize;

        for mut vehicle in snapshot {
            if !self.model_types.contains(&vehicle.model_type) {
                n_untracked += 1;
                continue;
            }
            vehicle.timestamp = self.now;
            let Some(reading) = Reading::resolve(vehicle, &capacities) else {
                n_unresolved += 1;
                continue;
            };
            let observation = differ.apply(&reading);
            tally.record(&observation);
            if let Observation::Consumption(event) = observation {
                events.push(event);
            }
            readings.push(reading);
        }

        self.consumption_log.append_all(&events).context("failed to log the consumption")?;
        if let Some(readings_log) = self.readings_log {
            readings_log.append_all(&readings).context("failed to log the readings")?;
        }
        self.state_store.save_all(differ.states()).context("failed to save the state")?;

        info!(
            n_vehicles,
            n_untracked,
            n_unresolved,
            n_baselines = tally.n_baselines,
            n_refuels = tally.n_refuels,
            n_unchanged = tally.n_unchanged,
            n_events = tally.n_consumptions,
            consumed = ?tally.consumed,
            refilled = ?tally.refilled,
            "collected",
        );
        Ok(Report { tally, events })
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, fs};

    use chrono::{TimeDelta, TimeZone};
    use tempfile::TempDir;

    use super::*;
    use crate::{
        core::{
            capacity::ModelCapacity,
            snapshot::{CarId, ModelId, VehicleSnapshot},
        },
        quantity::{percent::Percent, volume::Liters},
        store::csv::{LogFile, StateFile},
    };

    /// Fleet whose fuel levels are set by the test between the runs.
    struct FakeFleet {
        vehicles: RefCell<Vec<(u64, u8, f64)>>,
        has_fleet: bool,
        has_models: bool,
    }

    impl FakeFleet {
        fn new(vehicles: &[(u64, u8, f64)]) -> Self {
            Self { vehicles: RefCell::new(vehicles.to_vec()), has_fleet: true, has_models: true }
        }

        fn set(&self, vehicles: &[(u64, u8, f64)]) {
            *self.vehicles.borrow_mut() = vehicles.to_vec();
        }
    }

    impl FleetProvider for FakeFleet {
        fn get_snapshot(&self) -> Result<Vec<VehicleSnapshot>> {
            ensure!(self.has_fleet, "the fleet is unavailable");
            Ok(self
                .vehicles
                .borrow()
                .iter()
                .map(|(car_id, model_type, fuel)| VehicleSnapshot {
                    car_id: CarId(*car_id),
                    car_name: format!("Car {car_id}"),
                    model_id: ModelId(u64::from(*model_type)),
                    model_type: ModelType(*model_type),
                    fuel: Percent(*fuel),
                    available: true,
                    location: None,
                    timestamp: Local::now(),
                })
                .collect())
        }

        fn get_models(&self, model_type: ModelType) -> Result<Vec<ModelCapacity>> {
            ensure!(self.has_models, "the models are unavailable");
            Ok(vec![ModelCapacity {
                model_id: ModelId(u64::from(model_type.0)),
                model_name: format!("Model {model_type}"),
                max_fuel: Liters(50.0),
            }])
        }
    }

    struct Fixture {
        directory: TempDir,
        model_cache: ModelCache,
        state_file: StateFile,
        consumption_log: LogFile<ConsumptionEvent>,
        readings_log: LogFile<Reading>,
    }

    impl Fixture {
        fn new() -> Result<Self> {
            let directory = TempDir::new()?;
            Ok(Self {
                model_cache: ModelCache::new(directory.path().join("models.toml")),
                state_file: StateFile::new(directory.path().join("state.csv")),
                consumption_log: LogFile::new(directory.path().join("consumption.csv")),
                readings_log: LogFile::new(directory.path().join("readings.csv")),
                directory,
            })
        }

        fn run(&self, fleet: &FakeFleet, minute: i64) -> Result<Report> {
            Collector::builder()
                .provider(fleet)
                .model_cache(&self.model_cache)
                .model_types(&[ModelType(1), ModelType(2)])
                .state_store(&self.state_file)
                .consumption_log(&self.consumption_log)
                .readings_log(&self.readings_log)
                .now(
                    Local.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap()
                        + TimeDelta::minutes(minute),
                )
                .build()
                .run()
        }
    }

    #[test]
    fn first_run_is_baseline() -> Result {
        let fixture = Fixture::new()?;
        let report = fixture.run(&FakeFleet::new(&[(1, 1, 56.0), (2, 2, 20.0)]), 0)?;
        assert!(report.events.is_empty());
        assert_eq!(report.tally.n_baselines, 2);
        assert!(fixture.consumption_log.read_all()?.is_empty());
        assert_eq!(fixture.state_file.load_all()?.len(), 2);
        assert_eq!(fixture.readings_log.read_all()?.len(), 2);
        Ok(())
    }

    #[test]
    fn decrease_is_logged() -> Result {
        let fixture = Fixture::new()?;
        let fleet = FakeFleet::new(&[(1, 1, 56.0), (2, 2, 20.0)]);
        fixture.run(&fleet, 0)?;

        fleet.set(&[(1, 1, 43.0), (2, 2, 20.0)]);
        let report = fixture.run(&fleet, 10)?;
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].consumption, Liters(6.5));
        assert_eq!(report.tally.n_unchanged, 1);

        let logged = fixture.consumption_log.read_all()?;
        assert_eq!(logged, report.events);
        assert_eq!(fixture.state_file.load_all()?.get(CarId(1)).unwrap().fuel, Liters(21.5));

        // Same snapshot once again:
        let report = fixture.run(&fleet, 20)?;
        assert!(report.events.is_empty());
        assert_eq!(fixture.consumption_log.read_all()?.len(), 1);
        Ok(())
    }

    #[test]
    fn untracked_model_types_are_ignored() -> Result {
        let fixture = Fixture::new()?;
        let fleet = FakeFleet::new(&[(1, 1, 56.0), (3, 3, 80.0)]);
        fixture.run(&fleet, 0)?;
        fleet.set(&[(1, 1, 56.0), (3, 3, 10.0)]);
        let report = fixture.run(&fleet, 10)?;

        assert!(report.events.is_empty());
        let states = fixture.state_file.load_all()?;
        assert!(states.get(CarId(3)).is_none());
        assert_eq!(states.len(), 1);
        Ok(())
    }

    #[test]
    fn absent_cars_keep_their_state() -> Result {
        let fixture = Fixture::new()?;
        let fleet = FakeFleet::new(&[(1, 1, 56.0), (2, 1, 30.0)]);
        fixture.run(&fleet, 0)?;
        fleet.set(&[(1, 1, 50.0)]);
        fixture.run(&fleet, 10)?;
        assert_eq!(fixture.state_file.load_all()?.get(CarId(2)).unwrap().fuel, Liters(15.0));
        Ok(())
    }

    #[test]
    fn offline_fleet_aborts_without_writes() -> Result {
        let fixture = Fixture::new()?;
        let mut fleet = FakeFleet::new(&[(1, 1, 56.0)]);
        fixture.run(&fleet, 0)?;
        let state_before = fixture.state_file.load_all()?;

        fleet.set(&[(1, 1, 10.0)]);
        fleet.has_fleet = false;
        assert!(fixture.run(&fleet, 10).is_err());
        assert_eq!(fixture.state_file.load_all()?, state_before);
        assert!(fixture.consumption_log.read_all()?.is_empty());
        assert_eq!(fixture.readings_log.read_all()?.len(), 1);
        Ok(())
    }

    #[test]
    fn offline_fleet_leaves_model_cache_alone() -> Result {
        let fixture = Fixture::new()?;
        let mut fleet = FakeFleet::new(&[(1, 1, 56.0)]);
        fleet.has_fleet = false;
        assert!(fixture.run(&fleet, 0).is_err());
        assert!(!fixture.directory.path().join("models.toml").exists());
        assert!(!fixture.directory.path().join("state.csv").exists());
        Ok(())
    }

    #[test]
    fn missing_models_skip_every_vehicle() -> Result {
        let fixture = Fixture::new()?;
        let mut fleet = FakeFleet::new(&[(1, 1, 56.0), (2, 2, 20.0)]);
        fixture.run(&fleet, 0)?;
        let state_before = fixture.state_file.load_all()?;

        fs::remove_file(fixture.directory.path().join("models.toml"))?;
        fleet.has_models = false;
        fleet.set(&[(1, 1, 10.0), (2, 2, 5.0)]);
        let report = fixture.run(&fleet, 10)?;

        assert!(report.events.is_empty());
        assert_eq!(report.tally, Tally::default());
        assert!(fixture.consumption_log.read_all()?.is_empty());
        assert_eq!(fixture.state_file.load_all()?, state_before);
        assert!(!fixture.directory.path().join("models.toml").exists());
        Ok(())
    }
}
