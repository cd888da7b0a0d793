use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObservationError {
    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data from '{0}'")]
    CacheDecode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode cache data")]
    CacheEncode(#[source] Box<bincode::error::EncodeError>),

    #[error("No cached observations at '{0}' and fetching is disabled")]
    CacheMiss(PathBuf),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON response from {url}")]
    JsonParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Token response did not contain a TOKEN field")]
    MissingToken,

    #[error("Timeseries request for station '{station}' failed with code {code}: {message}")]
    Api {
        station: String,
        code: i64,
        message: String,
    },

    #[error("Timeseries response contains no station '{0}'")]
    StationNotFound(String),

    #[error("Station '{station}' reports no sensor for variable '{variable}'")]
    MissingVariable { station: String, variable: String },

    #[error("Observation series '{series}' has {found} values, expected {expected}")]
    SeriesLength {
        series: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid observation timestamp '{0}'")]
    Timestamp(String, #[source] chrono::ParseError),

    #[error("Load series has {found} values but the frame has {expected} rows")]
    LoadLength { expected: usize, found: usize },

    #[error("No observations to build a frame from for station '{0}'")]
    NoObservations(String),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing observation frame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
