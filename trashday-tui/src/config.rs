use std::{fs::File, path::PathBuf, sync::Mutex};

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use trashday_core::model::Coordinates;

#[derive(Debug, Parser)]
#[command(
    name = "trashday",
    version,
    about = "Find your holiday-adjusted trash pick-up day"
)]
pub(crate) struct Arguments {
    /// API key for reverse geocoding your location
    #[arg(long, env = "GEOCODE_API_KEY", hide_env_values = true)]
    pub geocode_api_key: Option<String>,
    /// latitude of your current location
    #[arg(long, requires = "longitude", allow_negative_numbers = true)]
    pub latitude: Option<f64>,
    /// longitude of your current location
    #[arg(long, requires = "latitude", allow_negative_numbers = true)]
    pub longitude: Option<f64>,
    /// street address to look up, e.g. "414 E 12th St"
    #[arg(long, conflicts_with = "latitude")]
    pub address: Option<String>,
    /// date to treat as today (YYYY-MM-DD)
    #[arg(long)]
    pub today: Option<NaiveDate>,
    /// print the pick-up day and exit instead of starting the terminal UI
    #[arg(long)]
    pub print: bool,
    /// append logs to this file, filtered by `RUST_LOG`
    #[arg(long, env = "TRASHDAY_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Arguments {
    pub(crate) fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }
}

/// Log to the configured file; the terminal belongs to the UI.
pub(crate) fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::options().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
