use std::{fs, path::PathBuf};

use clap::Parser;
use itertools::Itertools;

use crate::{
    cli::data::DataArgs,
    core::replay::{ReplayRow, replay},
    prelude::*,
    statistics::{Activity, Summary, by_car_name, mean_time_diff},
    store::{AppendLog, csv::LogFile},
    tables::{
        build_activity_table,
        build_breakdown_table,
        build_names_activity_table,
        build_summary_table,
        build_tracked_cars_table,
    },
};

#[derive(Parser)]
pub struct ReplayArgs {
    #[clap(flatten)]
    data: DataArgs,

    /// Output file, `calculated_consumption.csv` in the data directory by default.
    #[clap(long, env = "REPLAY_OUTPUT")]
    output: Option<PathBuf>,

    /// Number of the most frequently seen car names and cars to show.
    #[clap(long, default_value = "10")]
    top: usize,
}

impl ReplayArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        let readings = self.data.readings_log().read_all()?;
        let Some(activity) = Activity::try_from_readings(&readings) else {
            bail!("no readings yet, run `collect` first");
        };
        println!("{}", build_activity_table(&activity));
        println!("{}", build_names_activity_table(&activity, self.top));
        println!("{}", build_tracked_cars_table(&activity, self.top));

        let replayed = replay(readings);
        info!(n_events = replayed.len(), "replayed");

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| self.data.data_dir.join("calculated_consumption.csv"));
        if output.exists() {
            fs::remove_file(&output)
                .with_context(|| format!("failed to overwrite `{}`", output.display()))?;
        }
        let rows = replayed.iter().map(ReplayRow::from).collect_vec();
        LogFile::<ReplayRow>::new(&output).append_all(&rows)?;

        let events = replayed.iter().map(|replayed| replayed.event.clone()).collect_vec();
        match Summary::try_from_events(&events) {
            Some(mut summary) => {
                summary.mean_time_diff = mean_time_diff(&replayed);
                println!("{}", build_summary_table(&summary));
                println!("{}", build_breakdown_table("Car", &by_car_name(&events)));
                info!(path = %output.display(), "saved the consumption");
            }
            None => warn!("no consumption events found"),
        }
        Ok(())
    }
}
