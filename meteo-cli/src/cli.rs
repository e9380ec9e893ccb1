use anyhow::{Context, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use meteo_core::{
    Config, Table, TableRequest, fetch_table, fetch_tables,
    provider_from_config,
};
use std::{io, path::PathBuf};

use crate::configure;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Fetch weather time series as CSV tables")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or update the config file interactively.
    Configure,

    /// Fetch one location and print or export its table.
    Fetch {
        /// Latitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,

        /// Longitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,

        /// Label written into the `location` column.
        #[arg(long)]
        name: Option<String>,

        /// CSV file to write; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Fetch every configured location and write the combined table.
    Run {
        /// CSV file to write; defaults to `output` from the config file.
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Per-invocation overrides of the configured request.
#[derive(Debug, Args)]
pub struct Overrides {
    /// Response field holding the series, e.g. "hourly" or "daily".
    #[arg(long)]
    data_key: Option<String>,

    /// Comma-separated hourly variables, e.g. "temperature_2m,precipitation".
    #[arg(long, value_delimiter = ',')]
    hourly: Vec<String>,

    /// Comma-separated daily variables.
    #[arg(long, value_delimiter = ',')]
    daily: Vec<String>,

    #[arg(long)]
    timezone: Option<String>,

    /// First day to fetch (YYYY-MM-DD).
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last day to fetch (YYYY-MM-DD).
    #[arg(long)]
    end_date: Option<NaiveDate>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        let params = &mut config.params;

        if let Some(data_key) = self.data_key {
            config.data_key = data_key;
        }
        if !self.hourly.is_empty() {
            params.hourly = self.hourly;
        }
        if !self.daily.is_empty() {
            params.daily = self.daily;
        }
        if self.timezone.is_some() {
            params.timezone = self.timezone;
        }
        if self.start_date.is_some() {
            params.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            params.end_date = self.end_date;
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = self.config.as_deref();

        match self.command {
            Command::Configure => {
                let path = configure::run(config_path)?;
                println!("Configuration saved to {}", path.display());
            }
            Command::Fetch {
                latitude,
                longitude,
                name,
                output,
                overrides,
            } => {
                let mut config = Config::load(config_path)?;
                overrides.apply(&mut config);
                let provider = provider_from_config(&config)?;

                let mut request = TableRequest::new(
                    config.data_key.clone(),
                    config.params.clone().with_coordinates(latitude, longitude),
                );
                request.location_name = name;
                request.export = output.clone();

                let table = fetch_table(provider.as_ref(), &request)
                    .await
                    .context("Failed to fetch weather data")?;

                match output {
                    Some(path) => println!("Saved {} rows to {}", table.len(), path.display()),
                    None => table.write_csv_to(io::stdout().lock())?,
                }
            }
            Command::Run { output, overrides } => {
                let mut config = Config::load(config_path)?;
                overrides.apply(&mut config);

                if config.locations.is_empty() {
                    bail!(
                        "No locations configured.\n\
                         Hint: run `meteo configure` or add [[locations]] entries to the config file."
                    );
                }
                let output = output.or_else(|| config.output.clone()).context(
                    "No output file given.\nHint: pass --output or set `output` in the config file.",
                )?;

                let provider = provider_from_config(&config)?;
                let tables = fetch_tables(
                    provider.as_ref(),
                    &config.locations,
                    &config.data_key,
                    &config.params,
                )
                .await
                .context("Failed to fetch weather data")?;

                let combined = Table::concat(tables)?;
                combined.write_csv(&output)?;

                println!("Saved complete data to {}", output.display());
                println!(
                    "Data fetched and saved successfully ({} rows, {} locations).",
                    combined.len(),
                    config.locations.len()
                );
            }
        }

        Ok(())
    }
}
