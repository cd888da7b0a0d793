//! Daily load records and the ordered series the profile builder consumes.

use crate::profile::error::ProfileError;
use chrono::NaiveDate;

/// Total load for one calendar day, before day-of-year indexing.
///
/// Produced by summing sub-daily `load` observations per calendar date
/// (see [`crate::ObservationFrame::daily_totals`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub load: f64,
}

impl DailyTotal {
    /// Creates a daily total, rejecting negative or non-finite loads.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MalformedInput`] if `load` is negative, NaN or infinite.
    pub fn new(date: NaiveDate, load: f64) -> Result<Self, ProfileError> {
        if !load.is_finite() {
            return Err(ProfileError::MalformedInput {
                date,
                reason: format!("load {load} is not a finite number"),
            });
        }
        if load < 0.0 {
            return Err(ProfileError::MalformedInput {
                date,
                reason: format!("load {load} is negative"),
            });
        }
        Ok(Self { date, load })
    }
}

/// A daily total annotated with its day of year and day of week.
///
/// The derived fields are computed once by [`crate::index_days`] and cannot be
/// changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyRecord {
    date: NaiveDate,
    load: f64,
    day_of_year: u32,
    day_of_week: u32,
}

impl DailyRecord {
    pub(crate) fn new(date: NaiveDate, load: f64, day_of_year: u32, day_of_week: u32) -> Self {
        Self {
            date,
            load,
            day_of_year,
            day_of_week,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Summed energy over the day.
    pub fn load(&self) -> f64 {
        self.load
    }

    /// 1-based position of the date within its year (1..=366).
    pub fn day_of_year(&self) -> u32 {
        self.day_of_year
    }

    /// 0 = Monday .. 6 = Sunday.
    pub fn day_of_week(&self) -> u32 {
        self.day_of_week
    }
}

/// Daily records ordered by strictly increasing date.
///
/// Gaps between dates are allowed; they only shrink the samples drawn for
/// the affected windows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyLoadSeries {
    records: Vec<DailyRecord>,
}

impl DailyLoadSeries {
    /// Wraps already indexed records, checking that dates strictly increase.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::UnorderedSeries`] on the first duplicate or
    /// out-of-order date.
    pub fn new(records: Vec<DailyRecord>) -> Result<Self, ProfileError> {
        if let Some(pair) = records.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(ProfileError::UnorderedSeries {
                previous: pair[0].date,
                next: pair[1].date,
            });
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyRecord> {
        self.records.iter()
    }

    /// First and last date covered, if the series is not empty.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }
}

impl<'a> IntoIterator for &'a DailyLoadSeries {
    type Item = &'a DailyRecord;
    type IntoIter = std::slice::Iter<'a, DailyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
