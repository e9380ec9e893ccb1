//! Interactive `meteo configure` prompts.

use anyhow::Result;
use inquire::{Confirm, CustomType, Text, validator::Validation};
use meteo_core::{Config, Location};
use std::path::{Path, PathBuf};

/// Walk the user through the config file and save it. Returns the written path.
pub fn run(path: Option<&Path>) -> Result<PathBuf> {
    let mut config = match path {
        Some(p) if !p.exists() => Config::default(),
        _ => Config::load(path)?,
    };

    config.base_url = Text::new("API base URL:")
        .with_default(&config.base_url)
        .with_validator(|url: &str| {
            Ok(if url.trim().is_empty() {
                Validation::Invalid("The base URL must not be empty.".into())
            } else {
                Validation::Valid
            })
        })
        .prompt()?
        .trim()
        .to_string();

    config.data_key = Text::new("Series granularity (data key):")
        .with_default(&config.data_key)
        .with_help_message("e.g. hourly or daily")
        .prompt()?;

    let variables = Text::new(&format!("Variables for '{}' (comma-separated):", config.data_key))
        .with_default(&current_variables(&config).join(","))
        .prompt()?;
    let variables = split_list(&variables);
    match config.data_key.as_str() {
        "daily" => config.params.daily = variables,
        "current" => config.params.current = variables,
        _ => config.params.hourly = variables,
    }

    let timezone = Text::new("Timezone (empty for API default):")
        .with_default(config.params.timezone.as_deref().unwrap_or(""))
        .prompt()?;
    config.params.timezone = Some(timezone.trim().to_string()).filter(|tz| !tz.is_empty());

    let output = Text::new("Output CSV file for `meteo run`:")
        .with_default(
            &config
                .output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "weather.csv".to_string()),
        )
        .prompt()?;
    config.output = Some(PathBuf::from(output.trim()));

    let mut adding = Confirm::new("Add or update a location?")
        .with_default(config.locations.is_empty())
        .prompt()?;
    while adding {
        let name = Text::new("Location name:").prompt()?;
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a decimal number")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a decimal number")
            .prompt()?;
        config.upsert_location(Location::new(name.trim(), latitude, longitude));

        adding = Confirm::new("Add another location?")
            .with_default(false)
            .prompt()?;
    }

    config.validate()?;
    config.save(path)
}

fn current_variables(config: &Config) -> &[String] {
    match config.data_key.as_str() {
        "daily" => &config.params.daily,
        "current" => &config.params.current,
        _ => &config.params.hourly,
    }
}

fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
