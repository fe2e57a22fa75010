use clap::{Parser, Subcommand};
use itertools::Itertools;

use crate::{
    api::FleetProvider,
    cli::api::ApiArgs,
    core::{capacity::Capacities, reading::Reading},
    prelude::*,
    tables::{build_capacities_table, build_readings_table},
};

#[derive(Parser)]
pub struct BurrowArgs {
    #[clap(flatten)]
    api: ApiArgs,

    #[command(subcommand)]
    command: BurrowCommand,
}

#[derive(Subcommand)]
pub enum BurrowCommand {
    /// Fetch the model catalog bypassing the cache.
    Models,

    /// Fetch the fleet and show the resolved fuel levels.
    Cars {
        #[clap(long, default_value = "20")]
        limit: usize,
    },
}

impl BurrowArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        let provider = self.api.new_client();
        let capacities: Capacities =
            provider.get_catalog(&self.api.model_types)?.into_iter().collect();

        match self.command {
            BurrowCommand::Models => {
                println!("{}", build_capacities_table(&capacities));
            }
            BurrowCommand::Cars { limit } => {
                let readings = provider
                    .get_snapshot()?
                    .into_iter()
                    .filter(|vehicle| self.api.model_types.contains(&vehicle.model_type))
                    .filter_map(|vehicle| Reading::resolve(vehicle, &capacities))
                    .take(limit)
                    .collect_vec();
                info!(n_readings = readings.len(), "gotcha");
                println!("{}", build_readings_table(&readings));
            }
        }
        Ok(())
    }
}
