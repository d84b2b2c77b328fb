// src/bin/cli.rs
use clap::Parser;
use muni_scrape::{cli, log};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let _ = log::init();
    cli::run(cli::Args::parse())
}
