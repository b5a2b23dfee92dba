use std::env;
use std::process::exit;

use log::*;

use sunrise::cli::{self, Command};
use sunrise::defaults;
use sunrise::prelude::*;

fn main() {
    let config = match cli::parse_args(env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help { unrecognized }) => {
            for arg in unrecognized {
                println!("Input {arg} not understood.  Please use format below.\n");
            }
            print!("{}", cli::HELP);
            return;
        }
        Err(e) => {
            eprintln!("{e}\n");
            print!("{}", cli::HELP);
            exit(1);
        }
    };

    let level = if config.debug() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    debug!("***DEBUG MODE*** each step lasts 1 second");
    for line in config.to_string().lines() {
        debug!("{line}");
    }

    let res = if defaults::hardware_enabled() {
        run_ramp(config)
    } else {
        warn!("Hardware is not enabled, running the sunrise on simulated GPIO");
        run_ramp_with(config, || Ok(SimBackend::new()))
    };

    if let Err(e) = res {
        error!("{e}");
        exit(1);
    }
    debug!("***Program Finished***");
}
