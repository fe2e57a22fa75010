use clap::Parser;

use crate::{
    cli::data::DataArgs,
    prelude::*,
    statistics::{Summary, by_car_name, by_model_type},
    store::AppendLog,
    tables::{build_breakdown_table, build_summary_table},
};

#[derive(Parser)]
pub struct StatsArgs {
    #[clap(flatten)]
    data: DataArgs,
}

impl StatsArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        let events = self.data.consumption_log().read_all()?;
        let Some(summary) = Summary::try_from_events(&events) else {
            warn!("no consumption events found");
            return Ok(());
        };
        println!("{}", build_summary_table(&summary));
        println!("{}", build_breakdown_table("Car", &by_car_name(&events)));
        println!("{}", build_breakdown_table("Model type", &by_model_type(&events)));
        Ok(())
    }
}
