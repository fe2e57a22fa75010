use std::{
    fs::{self, OpenOptions},
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    core::{
        snapshot::CarId,
        state::{VehicleState, VehicleStates},
    },
    prelude::*,
    quantity::volume::Liters,
    store::{AppendLog, StateStore},
};

/// Fleet state as a CSV file with one row per car.
#[must_use]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Serialize, Deserialize)]
struct StateRow {
    car_id: CarId,
    car_name: String,

    #[serde(rename = "fuel_liters")]
    fuel: Liters,

    timestamp: DateTime<Local>,
}

impl StateStore for StateFile {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load_all(&self) -> Result<VehicleStates> {
        let mut states = VehicleStates::default();
        if !self.path.is_file() {
            info!("no state yet, starting from scratch");
            return Ok(states);
        }
        let mut reader = ReaderBuilder::new()
            .from_path(&self.path)
            .with_context(|| format!("failed to open `{}`", self.path.display()))?;
        for row in reader.deserialize::<StateRow>() {
            let row = row.with_context(|| format!("corrupt state in `{}`", self.path.display()))?;
            let state =
                VehicleState { car_name: row.car_name, fuel: row.fuel, timestamp: row.timestamp };
            if states.insert(row.car_id, state).is_some() {
                warn!(car_id = %row.car_id, "duplicate state, the last one wins");
            }
        }
        info!(n_states = states.len(), "loaded the state");
        Ok(states)
    }

    #[instrument(skip_all, fields(path = %self.path.display(), n_states = states.len()))]
    fn save_all(&self, states: &VehicleStates) -> Result {
        let temporary_path = with_suffix(&self.path, ".tmp");
        let mut writer = WriterBuilder::new()
            .from_path(&temporary_path)
            .with_context(|| format!("failed to create `{}`", temporary_path.display()))?;
        for (car_id, state) in states {
            writer.serialize(StateRow {
                car_id: *car_id,
                car_name: state.car_name.clone(),
                fuel: state.fuel,
                timestamp: state.timestamp,
            })?;
        }
        writer.flush()?;
        drop(writer);
        fs::rename(&temporary_path, &self.path)
            .with_context(|| format!("failed to replace `{}`", self.path.display()))?;
        info!("saved the state");
        Ok(())
    }
}

/// Append-only CSV log, the header is written when the file gets created.
#[must_use]
pub struct LogFile<T> {
    path: PathBuf,
    marker: PhantomData<fn() -> T>,
}

impl<T> LogFile<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), marker: PhantomData }
    }

    /// A missing log is empty, any other metadata error is propagated.
    fn is_empty(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(true),
            Err(error) => {
                Err(error).with_context(|| format!("failed to inspect `{}`", self.path.display()))
            }
        }
    }
}

impl<T: Serialize + DeserializeOwned> AppendLog<T> for LogFile<T> {
    #[instrument(skip_all, fields(path = %self.path.display(), n_records = records.len()))]
    fn append_all(&self, records: &[T]) -> Result {
        if records.is_empty() {
            return Ok(());
        }
        let has_headers = self.is_empty()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open `{}`", self.path.display()))?;
        let mut writer = WriterBuilder::new().has_headers(has_headers).from_writer(file);
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().with_context(|| format!("failed to write `{}`", self.path.display()))?;
        debug!("appended");
        Ok(())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn read_all(&self) -> Result<Vec<T>> {
        if self.is_empty()? {
            return Ok(Vec::new());
        }
        let records = ReaderBuilder::new()
            .from_path(&self.path)
            .with_context(|| format!("failed to open `{}`", self.path.display()))?
            .deserialize()
            .collect::<Result<Vec<T>, _>>()
            .with_context(|| format!("corrupt record in `{}`", self.path.display()))?;
        info!(n_records = records.len(), "read the log");
        Ok(records)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut path = path.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}
