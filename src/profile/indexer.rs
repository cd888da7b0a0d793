//! Attaches day-of-year and day-of-week to daily totals.

use crate::profile::error::ProfileError;
use crate::types::daily_record::{DailyLoadSeries, DailyRecord, DailyTotal};
use chrono::{Datelike, NaiveDate};

const DASHED_FORMAT: &str = "%Y-%m-%d";

/// Indexes a single daily total.
pub fn index_record(total: DailyTotal) -> DailyRecord {
    DailyRecord::new(
        total.date,
        total.load,
        total.date.ordinal(),
        total.date.weekday().num_days_from_monday(),
    )
}

/// Turns daily totals into a [`DailyLoadSeries`] with day of year (1-based,
/// proleptic Gregorian) and day of week (0 = Monday) attached to every record.
///
/// # Errors
///
/// Returns [`ProfileError::UnorderedSeries`] if dates are duplicated or not
/// in increasing order.
pub fn index_days(
    totals: impl IntoIterator<Item = DailyTotal>,
) -> Result<DailyLoadSeries, ProfileError> {
    DailyLoadSeries::new(totals.into_iter().map(index_record).collect())
}

/// Indexes `(date string, load)` pairs, parsing each date with [`parse_date`].
///
/// # Errors
///
/// Propagates the first date parsing error or malformed load.
pub fn index_date_strings<'a>(
    rows: impl IntoIterator<Item = (&'a str, f64)>,
) -> Result<DailyLoadSeries, ProfileError> {
    let totals = rows
        .into_iter()
        .map(|(date, load)| DailyTotal::new(parse_date(date)?, load))
        .collect::<Result<Vec<_>, _>>()?;
    index_days(totals)
}

/// Parses `YYYYMMDD` or `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate, ProfileError> {
    let trimmed = input.trim();
    let compact = if trimmed.len() == 8 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        // Split by position, %Y alone may swallow all eight digits.
        let year = trimmed[..4].parse().ok();
        let month = trimmed[4..6].parse().ok();
        let day = trimmed[6..].parse().ok();
        match (year, month, day) {
            (Some(y), Some(m), Some(d)) => NaiveDate::from_ymd_opt(y, m, d),
            _ => None,
        }
    } else {
        None
    };
    compact
        .or_else(|| NaiveDate::parse_from_str(trimmed, DASHED_FORMAT).ok())
        .ok_or_else(|| ProfileError::DateParse {
            input: input.to_string(),
        })
}

/// Day of year for a date string such as `"20120101"` or `"2012-03-01"`.
///
/// # Examples
///
/// ```
/// use load_profile::day_of_year;
///
/// assert_eq!(day_of_year("20120101").unwrap(), 1);
/// assert_eq!(day_of_year("2012-03-01").unwrap(), 61); // leap year
/// ```
pub fn day_of_year(input: &str) -> Result<u32, ProfileError> {
    parse_date(input).map(|date| date.ordinal())
}
