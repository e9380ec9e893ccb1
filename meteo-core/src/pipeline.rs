use std::path::PathBuf;
use tracing::{debug, info};

use crate::{
    error::Result,
    model::{Location, Table},
    params::QueryParams,
    provider::WeatherProvider,
    reshape::reshape,
};

pub const DEFAULT_DATA_KEY: &str = "hourly";

/// Everything needed to turn one API call into one table.
#[derive(Debug, Clone)]
pub struct TableRequest {
    /// Response field holding the series, e.g. "hourly" or "daily".
    pub data_key: String,
    pub params: QueryParams,
    /// Written as the leading `location` column when set.
    pub location_name: Option<String>,
    /// When set, the table is also written to this CSV file.
    pub export: Option<PathBuf>,
}

impl TableRequest {
    pub fn new(data_key: impl Into<String>, params: QueryParams) -> Self {
        Self {
            data_key: data_key.into(),
            params,
            location_name: None,
            export: None,
        }
    }

    pub fn with_location_name(mut self, name: impl Into<String>) -> Self {
        self.location_name = Some(name.into());
        self
    }

    pub fn with_export(mut self, path: impl Into<PathBuf>) -> Self {
        self.export = Some(path.into());
        self
    }
}

/// Fetch one payload, reshape it into a table and optionally export it.
pub async fn fetch_table(provider: &dyn WeatherProvider, request: &TableRequest) -> Result<Table> {
    let query = request.params.to_query();
    let payload = provider.fetch_payload(&query).await?;

    let table = reshape(
        &payload,
        &request.data_key,
        request.location_name.as_deref(),
        &request.params,
    )?;
    debug!(
        rows = table.len(),
        columns = table.columns().len(),
        "Reshaped weather series"
    );

    if let Some(path) = &request.export {
        table.write_csv(path)?;
    }

    Ok(table)
}

/// Fetch a table per location, in order. The first failure aborts the batch.
///
/// Per-location export is not supported here; combine the tables with
/// [`Table::concat`] and write the result instead.
pub async fn fetch_tables(
    provider: &dyn WeatherProvider,
    locations: &[Location],
    data_key: &str,
    params: &QueryParams,
) -> Result<Vec<Table>> {
    let mut tables = Vec::with_capacity(locations.len());

    for location in locations {
        info!(
            location = %location.name,
            latitude = location.latitude,
            longitude = location.longitude,
            "Fetching weather data"
        );

        let request = TableRequest::new(
            data_key,
            params
                .clone()
                .with_coordinates(location.latitude, location.longitude),
        )
        .with_location_name(&location.name);

        tables.push(fetch_table(provider, &request).await?);
    }

    Ok(tables)
}
