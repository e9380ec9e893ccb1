use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{Config, error::Result, provider::open_meteo::OpenMeteoProvider};

pub mod open_meteo;

/// Source of raw forecast payloads.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Issue one request with the given query pairs and return the parsed JSON body.
    async fn fetch_payload(&self, query: &[(String, String)]) -> Result<Value>;
}

/// Construct the HTTP provider for the configured base URL.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let base_url = config.base_url.trim();
    if base_url.is_empty() {
        anyhow::bail!(
            "No base URL configured.\n\
             Hint: run `meteo configure` or set `base_url` in the config file."
        );
    }

    Ok(Box::new(OpenMeteoProvider::new(base_url)))
}
