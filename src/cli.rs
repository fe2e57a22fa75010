mod api;
mod burrow;
mod collect;
mod data;
mod heartbeat;
mod replay;
mod stats;

use clap::{Parser, Subcommand};

pub use self::{burrow::BurrowArgs, collect::CollectArgs, replay::ReplayArgs, stats::StatsArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: fetch the fleet, detect fuel consumption, and save the new state.
    #[clap(name = "collect")]
    Collect(Box<CollectArgs>),

    /// Re-derive the consumption events from the readings log.
    #[clap(name = "replay")]
    Replay(ReplayArgs),

    /// Summarize the consumption log.
    #[clap(name = "stats")]
    Stats(StatsArgs),

    /// Development tools.
    #[clap(name = "burrow")]
    Burrow(Box<BurrowArgs>),
}
