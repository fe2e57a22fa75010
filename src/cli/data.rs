use std::{fs, path::PathBuf};

use clap::Parser;

use crate::{
    cache::ModelCache,
    core::{event::ConsumptionEvent, reading::Reading},
    prelude::*,
    store::csv::{LogFile, StateFile},
};

#[derive(Parser)]
pub struct DataArgs {
    /// Directory with the state, the model cache, and the logs.
    #[clap(long, env = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,
}

impl DataArgs {
    pub fn ensure_exists(&self) -> Result {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create `{}`", self.data_dir.display()))
    }

    pub fn state_file(&self) -> StateFile {
        StateFile::new(self.data_dir.join("state.csv"))
    }

    pub fn model_cache(&self) -> ModelCache {
        ModelCache::new(self.data_dir.join("models.toml"))
    }

    pub fn consumption_log(&self) -> LogFile<ConsumptionEvent> {
        LogFile::new(self.data_dir.join("consumption.csv"))
    }

    pub fn readings_log(&self) -> LogFile<Reading> {
        LogFile::new(self.data_dir.join("readings.csv"))
    }
}
