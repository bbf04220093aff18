#![recursion_limit = "1024"]

use clap::Parser;
use colored::*;
use log::info;
use std::time::Instant;
use structure_functions::config::cli::Cli;
use structure_functions::{orchestrator, Config};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(ref e) = run(&cli) {
        eprintln!("{}", orchestrator::render_fatal(e));

        for cause in e.iter().skip(1) {
            eprintln!("caused by: {}", cause);
        }

        if let Some(backtrace) = e.backtrace() {
            eprintln!("backtrace: {:?}", backtrace);
        }

        std::process::exit(1);
    }

    std::process::exit(0);
}

fn run(cli: &Cli) -> structure_functions::Result<()> {
    let config = Config::load(cli)?;
    info!(
        "starting run: grid ({}, {}, {}), q in [{}, {}]",
        config.nx, config.ny, config.nz, config.q1, config.q2
    );

    let start = Instant::now();
    orchestrator::run(&config)?;
    let elapsed = start.elapsed();

    println!(
        "{} in {:.3}s",
        "done".green().bold(),
        elapsed.as_secs_f64()
    );

    Ok(())
}
