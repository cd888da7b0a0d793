//! Reads daily load totals out of a Polars frame.

use crate::profile::error::ProfileError;
use crate::types::daily_record::DailyTotal;
use chrono::{Duration, NaiveDate};
use polars::prelude::*;

/// Converts a frame with a `date` (Date) and a numeric `load` column into
/// daily totals, row by row.
///
/// # Errors
///
/// Returns [`ProfileError::Frame`] if a column is missing or has the wrong type,
/// [`ProfileError::MissingValue`] for null cells, and
/// [`ProfileError::MalformedInput`] for negative or non-finite loads.
pub fn daily_totals_from_frame(frame: &DataFrame) -> Result<Vec<DailyTotal>, ProfileError> {
    // 1970-01-01, the origin of the Date physical representation.
    let epoch = NaiveDate::default();
    let dates = frame.column("date")?.cast(&DataType::Int32)?;
    let loads = frame.column("load")?.cast(&DataType::Float64)?;

    dates
        .i32()?
        .into_iter()
        .zip(loads.f64()?.into_iter())
        .enumerate()
        .map(|(row, (days, load))| {
            let days = days.ok_or(ProfileError::MissingValue {
                row,
                column: "date",
            })?;
            let load = load.ok_or(ProfileError::MissingValue {
                row,
                column: "load",
            })?;
            DailyTotal::new(epoch + Duration::days(i64::from(days)), load)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reads_dates_and_loads() -> Result<(), Box<dyn std::error::Error>> {
        let frame = df!(
            "date" => vec![date(2019, 1, 1), date(2019, 1, 2)],
            "load" => vec![10.5f64, 11.0],
        )?;
        let totals = daily_totals_from_frame(&frame)?;
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].date, date(2019, 1, 1));
        assert_eq!(totals[1].load, 11.0);
        Ok(())
    }

    #[test]
    fn test_integer_loads_are_accepted() -> Result<(), Box<dyn std::error::Error>> {
        let frame = df!(
            "date" => vec![date(2019, 1, 1)],
            "load" => vec![120_000i64],
        )?;
        assert_eq!(daily_totals_from_frame(&frame)?[0].load, 120_000.0);
        Ok(())
    }

    #[test]
    fn test_null_load_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let frame = df!(
            "date" => vec![date(2019, 1, 1), date(2019, 1, 2)],
            "load" => vec![Some(1.0f64), None],
        )?;
        match daily_totals_from_frame(&frame) {
            Err(ProfileError::MissingValue { row, column }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "load");
            }
            other => panic!("Expected MissingValue, got {:?}", other),
        }
        Ok(())
    }
}
