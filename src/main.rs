#![doc = include_str!("../README.md")]

mod api;
mod cache;
mod cli;
mod core;
mod prelude;
mod quantity;
mod statistics;
mod store;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Collect(args) => args.run()?,
        Command::Replay(args) => args.run()?,
        Command::Stats(args) => args.run()?,
        Command::Burrow(args) => args.run()?,
    }

    info!("done!");
    Ok(())
}
