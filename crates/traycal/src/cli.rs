//! CLI command definitions.

use std::path::PathBuf;

use chrono::Weekday;
use clap::{Args, Parser, Subcommand, ValueEnum};

use traycal_core::calendar::MonthKey;

use crate::config::{parse_week_start, Config};

/// Month calendar with packed appointment bars.
#[derive(Debug, Parser)]
#[command(name = "traycal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// JSON event store to read instead of the demo calendars.
    #[arg(long, global = true)]
    pub events_file: Option<PathBuf>,

    /// Upper bound for fetching one month, in seconds.
    #[arg(long, global = true)]
    pub fetch_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable month grid.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print one month with its appointments.
    Show(GridArgs),
    /// List the calendars of the configured source.
    Calendars,
    /// Keep printing the month as fetches complete and days change.
    Watch(GridArgs),
}

/// Options shared by the grid commands.
#[derive(Debug, Clone, Args)]
pub struct GridArgs {
    /// Month to show as YYYY-MM (default: current month).
    #[arg(long)]
    pub month: Option<MonthKey>,

    /// Appointment sub-rows per week.
    #[arg(long)]
    pub rows: Option<usize>,

    /// First day of the week: sunday or monday.
    #[arg(long, value_parser = week_start_arg)]
    pub week_start: Option<Weekday>,
}

impl Cli {
    /// Overrides `config` with the global flags that were given.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(path) = &self.events_file {
            config.events_file = Some(path.clone());
        }
        if let Some(seconds) = self.fetch_timeout {
            config.fetch_timeout_seconds = seconds;
        }
        if let Commands::Show(args) | Commands::Watch(args) = &self.command {
            if let Some(rows) = args.rows {
                config.row_capacity = rows;
            }
            if let Some(week_start) = args.week_start {
                config.week_start = week_start;
            }
        }
        config
    }
}

fn week_start_arg(value: &str) -> Result<Weekday, String> {
    parse_week_start(value).ok_or_else(|| format!("unsupported week start: {}", value))
}
