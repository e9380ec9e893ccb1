use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network request failed for {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse weather response JSON")]
    Decode(#[source] serde_json::Error),

    #[error("Unexpected weather response: {0}")]
    InvalidPayload(String),

    #[error("'{0}' not found in the response")]
    MissingKey(String),

    #[error("Series '{series}' under '{data_key}' is not an array")]
    InvalidSeries { data_key: String, series: String },

    #[error("Series '{series}' has {found} values but 'time' has {expected}")]
    MisalignedSeries {
        series: String,
        expected: usize,
        found: usize,
    },

    #[error("Column '{0}' appears more than once in the table")]
    DuplicateColumn(String),

    #[error("Row has {found} values but the table has {expected} columns")]
    RowWidth { expected: usize, found: usize },

    #[error("Cannot concatenate tables with different columns: expected [{}], found [{}]", .expected.join(", "), .found.join(", "))]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to write CSV file '{0}'")]
    CsvWrite(PathBuf, #[source] csv::Error),

    #[error("Failed to read CSV file '{0}'")]
    CsvRead(PathBuf, #[source] csv::Error),

    #[error("Failed to write CSV output")]
    CsvOutput(#[source] csv::Error),
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
