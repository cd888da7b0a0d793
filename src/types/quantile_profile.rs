//! Per-day-of-year quantile tables produced by the profile builder.

use crate::types::day_class::DayClass;
use polars::prelude::*;

/// Number of days a profile covers. Day 366 never gets a row.
pub const DAYS_IN_PROFILE: u32 = 365;

/// Quantile levels computed for every profile row, in column order.
pub const QUANTILE_LEVELS: [f64; 5] = [0.01, 0.05, 0.5, 0.95, 0.99];

/// Column names matching [`QUANTILE_LEVELS`].
pub const QUANTILE_COLUMNS: [&str; 5] = ["q01", "q05", "q50", "q95", "q99"];

/// The five load quantiles of one window sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileBand {
    pub q01: f64,
    pub q05: f64,
    pub q50: f64,
    pub q95: f64,
    pub q99: f64,
}

impl QuantileBand {
    pub(crate) fn from_levels(values: [f64; 5]) -> Self {
        let [q01, q05, q50, q95, q99] = values;
        Self {
            q01,
            q05,
            q50,
            q95,
            q99,
        }
    }

    /// Values in [`QUANTILE_LEVELS`] order.
    pub fn as_array(&self) -> [f64; 5] {
        [self.q01, self.q05, self.q50, self.q95, self.q99]
    }

    pub fn is_monotonic(&self) -> bool {
        self.as_array().windows(2).all(|pair| pair[0] <= pair[1])
    }
}

/// Mapping from day of year (1..=365) to a [`QuantileBand`] for one [`DayClass`].
///
/// A day whose window sample was empty has no band (`None`); the rest of the
/// profile is unaffected.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileProfile {
    class: DayClass,
    window_radius: u32,
    rows: Vec<Option<QuantileBand>>,
}

impl QuantileProfile {
    pub(crate) fn new(class: DayClass, window_radius: u32, rows: Vec<Option<QuantileBand>>) -> Self {
        debug_assert_eq!(rows.len(), DAYS_IN_PROFILE as usize);
        Self {
            class,
            window_radius,
            rows,
        }
    }

    pub fn class(&self) -> DayClass {
        self.class
    }

    pub fn window_radius(&self) -> u32 {
        self.window_radius
    }

    /// Band for `day_of_year`, or `None` if the day is out of range or its window was empty.
    pub fn get(&self, day_of_year: u32) -> Option<&QuantileBand> {
        let index = day_of_year.checked_sub(1)? as usize;
        self.rows.get(index)?.as_ref()
    }

    /// Iterates `(day_of_year, band)` for days 1..=365.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Option<&QuantileBand>)> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, band)| (i as u32 + 1, band.as_ref()))
    }

    /// Days whose window sample was empty.
    pub fn missing_days(&self) -> Vec<u32> {
        self.iter()
            .filter(|(_, band)| band.is_none())
            .map(|(day, _)| day)
            .collect()
    }

    /// Converts the profile into a table with `day_of_year` and one nullable
    /// column per quantile level.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let days: Vec<u32> = (1..=DAYS_IN_PROFILE).collect();
        let column = |pick: fn(&QuantileBand) -> f64| -> Vec<Option<f64>> {
            self.rows.iter().map(|band| band.as_ref().map(pick)).collect()
        };
        df!(
            "day_of_year" => days,
            QUANTILE_COLUMNS[0] => column(|b| b.q01),
            QUANTILE_COLUMNS[1] => column(|b| b.q05),
            QUANTILE_COLUMNS[2] => column(|b| b.q50),
            QUANTILE_COLUMNS[3] => column(|b| b.q95),
            QUANTILE_COLUMNS[4] => column(|b| b.q99),
        )
    }
}

/// The weekday-class and weekend-class profiles built from one series.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProfiles {
    pub weekday: QuantileProfile,
    pub weekend: QuantileProfile,
}

impl LoadProfiles {
    pub fn get(&self, class: DayClass) -> &QuantileProfile {
        match class {
            DayClass::Weekday => &self.weekday,
            DayClass::Weekend => &self.weekend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_gap() -> QuantileProfile {
        let band = QuantileBand::from_levels([1.0, 2.0, 3.0, 4.0, 5.0]);
        let rows = (1..=DAYS_IN_PROFILE)
            .map(|day| if day == 100 { None } else { Some(band) })
            .collect();
        QuantileProfile::new(DayClass::Weekday, 7, rows)
    }

    #[test]
    fn test_get_is_one_based() {
        let profile = profile_with_gap();
        assert!(profile.get(0).is_none());
        assert!(profile.get(1).is_some());
        assert!(profile.get(365).is_some());
        assert!(profile.get(366).is_none());
        assert!(profile.get(100).is_none());
    }

    #[test]
    fn test_missing_days() {
        assert_eq!(profile_with_gap().missing_days(), vec![100]);
    }

    #[test]
    fn test_to_dataframe_has_nulls_for_missing_days() -> Result<(), Box<dyn std::error::Error>> {
        let df = profile_with_gap().to_dataframe()?;
        assert_eq!(df.height(), 365);
        assert_eq!(df.width(), 6);
        let q50 = df.column("q50")?.f64()?;
        assert_eq!(q50.null_count(), 1);
        assert_eq!(q50.get(99), None);
        assert_eq!(q50.get(0), Some(3.0));
        Ok(())
    }

    #[test]
    fn test_band_monotonicity_check() {
        assert!(QuantileBand::from_levels([1.0, 1.0, 2.0, 3.0, 3.0]).is_monotonic());
        assert!(!QuantileBand::from_levels([1.0, 3.0, 2.0, 3.0, 3.0]).is_monotonic());
    }
}
