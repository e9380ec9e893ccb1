//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - Configuration (base URL, shared query parameters, locations)
//! - Abstraction over the forecast HTTP API
//! - Reshaping of column-oriented series into row-oriented tables
//! - CSV export of those tables
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod params;
pub mod pipeline;
pub mod provider;
pub mod reshape;

pub use config::Config;
pub use error::WeatherError;
pub use model::{Location, Row, Table};
pub use params::{ParamValue, QueryParams};
pub use pipeline::{TableRequest, fetch_table, fetch_tables};
pub use provider::{WeatherProvider, open_meteo::OpenMeteoProvider, provider_from_config};
