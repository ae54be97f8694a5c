#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::Parser;

use crate::{
    data::client::DEFAULT_API_URL,
    domain::{CalendarDay, DateInterval},
};

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "gim-viewer",
    version,
    about = "Terminal dashboard for GIM TEC forecasts"
)]
pub struct Cli {
    /// Forecast API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Model code to open (default: last used, else first listed)
    #[arg(long)]
    pub model: Option<String>,

    /// First day of the metrics window (YYYY-MM-DD, requires --to)
    #[arg(long)]
    pub from: Option<CalendarDay>,

    /// Last day of the metrics window (YYYY-MM-DD, requires --from)
    #[arg(long)]
    pub to: Option<CalendarDay>,

    /// Metrics refresh interval in seconds
    #[arg(long, default_value_t = 900)]
    pub refresh_interval: u64,

    /// Directory for downloaded forecast archives
    #[arg(long, default_value = ".")]
    pub download_dir: PathBuf,

    /// Write logs to this file (the terminal is owned by the dashboard)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Do not read or write the settings file
    #[arg(long)]
    pub no_persist: bool,

    /// Print the normalized metrics table to stdout and exit (non-interactive)
    #[arg(long)]
    pub one_shot: bool,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.explicit_range().map(|_| ())
    }

    /// Metrics window given on the command line, if any.
    pub fn explicit_range(&self) -> anyhow::Result<Option<DateInterval>> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Ok(Some(DateInterval::new(from, to)?)),
            (None, None) => Ok(None),
            _ => anyhow::bail!("--from and --to must be provided together"),
        }
    }
}
