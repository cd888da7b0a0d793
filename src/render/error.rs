use crate::types::day_class::DayClass;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Drawing(String),

    #[error("The {0} profile has no days with data to draw")]
    EmptyProfile(DayClass),

    #[error("The observation frame has no rows to draw")]
    EmptyFrame,

    #[error("Column '{column}' has type {dtype}, expected a datetime")]
    UnexpectedColumnType { column: String, dtype: String },

    #[error("Failed reading chart data from frame: {0}")]
    Frame(#[from] PolarsError),
}

pub(crate) fn drawing_error<E: std::error::Error + Send + Sync>(
    error: plotters::drawing::DrawingAreaErrorKind<E>,
) -> RenderError {
    RenderError::Drawing(error.to_string())
}
