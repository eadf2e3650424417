use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dashboard_core::{JobKind, Theme};

#[derive(Debug, Parser)]
#[command(name = "dashboard_app")]
#[command(about = "Start parser jobs on the admin backend and follow their progress")]
pub struct Cli {
    /// Configuration file (RON). Missing file means defaults.
    #[arg(long, global = true, default_value = "dashboard.ron")]
    pub config: PathBuf,

    /// Overrides `base_url` from the configuration file.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Mirror the log to stderr as well as `dashboard.log`.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a parser and follow it until it finishes
    Run {
        /// Parser to run: olx or krisha
        job: JobKind,

        /// Poll interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Fetch the current parser status once
    Status,

    /// Show or change the display theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    Show,
    Toggle,
    Set { theme: Theme },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "dashboard_app",
            "run",
            "krisha",
            "--interval-ms",
            "500",
            "--base-url",
            "http://admin.local",
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://admin.local"));
        match cli.command {
            Command::Run { job, interval_ms } => {
                assert_eq!(job, JobKind::Krisha);
                assert_eq!(interval_ms, Some(500));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_job() {
        assert!(Cli::try_parse_from(["dashboard_app", "run", "avito"]).is_err());
    }

    #[test]
    fn theme_without_action_defaults_to_show() {
        let cli = Cli::try_parse_from(["dashboard_app", "theme"]).unwrap();
        assert!(matches!(cli.command, Command::Theme { action: None }));

        let cli = Cli::try_parse_from(["dashboard_app", "theme", "set", "dark"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Theme {
                action: Some(ThemeAction::Set { theme: Theme::Dark })
            }
        ));
    }
}
