//! Process wiring: logging, configuration, the effect runner and the terminal surface.
mod app;
mod effects;
mod logging;
mod persistence;
mod ui;

use std::process::ExitCode;

use anyhow::Result;

use crate::cli::{Cli, Command};
use crate::config::DashboardConfig;

pub fn run(cli: Cli) -> Result<ExitCode> {
    logging::initialize(if cli.verbose {
        logging::LogDestination::Both
    } else {
        logging::LogDestination::File
    });

    let mut config = DashboardConfig::load(&cli.config)?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Command::Run { job, interval_ms } => {
            if let Some(interval_ms) = interval_ms {
                config.poll_interval_ms = interval_ms;
            }
            config.validate()?;
            let outcome = app::run_job(&config, job)?;
            Ok(outcome.exit_code())
        }
        Command::Status => {
            app::show_status(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Theme { action } => {
            app::theme_command(&config, action)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
