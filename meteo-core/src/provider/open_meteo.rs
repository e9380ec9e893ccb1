use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, WeatherError};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Talks to an Open-Meteo compatible endpoint, e.g. the forecast or archive API.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch_payload(&self, query: &[(String, String)]) -> Result<Value> {
        debug!(url = %self.base_url, ?query, "Requesting weather data");

        let res = self
            .http
            .get(&self.base_url)
            .query(query)
            .send()
            .await
            .map_err(|source| WeatherError::Request {
                url: self.base_url.clone(),
                source,
            })?;

        let status = res.status();
        let url = res.url().to_string();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Request {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            warn!(%url, %status, "Weather API returned an error status");
            return Err(WeatherError::HttpStatus {
                url,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(WeatherError::Decode)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
