mod app;
mod cli;
mod config;
mod consts;
mod error;
mod logs;
mod mission;
mod output;
mod utils;

use std::process::ExitCode;

use clap::Parser;

use app::CommandContext;
use cli::Cli;
use config::Config;
use utils::{Timezone, set_debug};

fn main() -> ExitCode {
    let cli = Cli::parse();
    set_debug(cli.debug);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let cli = cli.with_config(&config);
    set_debug(cli.debug);

    let timezone = match Timezone::parse(cli.timezone.as_deref()) {
        Ok(tz) => tz,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let ctx = CommandContext {
        cli: &cli,
        config: &config,
        timezone,
    };
    match app::run(&ctx) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
