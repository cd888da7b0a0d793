use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Malformed daily record for {date}: {reason}")]
    MalformedInput { date: NaiveDate, reason: String },

    #[error("Missing value in daily totals at row {row}: {column} is null")]
    MissingValue { row: usize, column: &'static str },

    #[error("Could not parse '{input}' as a date (expected YYYYMMDD or YYYY-MM-DD)")]
    DateParse { input: String },

    #[error("Daily series dates must strictly increase, found {previous} followed by {next}")]
    UnorderedSeries { previous: NaiveDate, next: NaiveDate },

    #[error("Window radius must be non-negative, got {0}")]
    InvalidWindowRadius(i32),

    #[error("Center day must be within 1..=365, got {0}")]
    InvalidCenterDay(u32),

    #[error("Failed processing daily totals frame: {0}")]
    Frame(#[from] PolarsError),
}
