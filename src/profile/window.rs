//! Sliding day-of-year window that wraps around the end of the year.

use crate::profile::error::ProfileError;
use crate::types::daily_record::DailyRecord;
use crate::types::quantile_profile::DAYS_IN_PROFILE;

const RING: i64 = DAYS_IN_PROFILE as i64;

/// A window of `radius` days on each side of `center_day`, with bounds taken
/// modulo 365.
///
/// A window that stays within `0..=364` selects the closed interval between
/// its bounds. One that runs past either end selects everything from the
/// lower bound upwards plus everything up to the upper bound, which includes
/// day 366 of a leap year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircularWindow {
    center_day: u32,
    radius: u32,
}

impl CircularWindow {
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidCenterDay`] if `center_day` is outside
    /// `1..=365`, or [`ProfileError::InvalidWindowRadius`] if `radius` is negative.
    pub fn new(center_day: u32, radius: i32) -> Result<Self, ProfileError> {
        if !(1..=DAYS_IN_PROFILE).contains(&center_day) {
            return Err(ProfileError::InvalidCenterDay(center_day));
        }
        let radius = u32::try_from(radius).map_err(|_| ProfileError::InvalidWindowRadius(radius))?;
        Ok(Self { center_day, radius })
    }

    pub fn center_day(&self) -> u32 {
        self.center_day
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    fn reach(&self) -> (i64, i64) {
        let center = i64::from(self.center_day);
        let radius = i64::from(self.radius);
        (center - radius, center + radius)
    }

    /// Lower and upper bound modulo 365, both in `0..=364`.
    pub fn bounds(&self) -> (u32, u32) {
        let (first, last) = self.reach();
        (first.rem_euclid(RING) as u32, last.rem_euclid(RING) as u32)
    }

    /// Whether the window runs below day 0 or above day 364.
    pub fn crosses_year_boundary(&self) -> bool {
        let (first, last) = self.reach();
        first < 0 || last > RING - 1
    }

    /// Whether every day of year, 366 included, lies in the window.
    pub fn covers_year(&self) -> bool {
        (1..=DAYS_IN_PROFILE + 1).all(|day| self.contains(day))
    }

    /// Whether `day_of_year` (1..=366) lies inside the window.
    pub fn contains(&self, day_of_year: u32) -> bool {
        let (lo, hi) = self.bounds();
        if self.crosses_year_boundary() {
            day_of_year >= lo || day_of_year <= hi
        } else {
            (lo..=hi).contains(&day_of_year)
        }
    }
}

/// Records whose day of year falls inside `window`.
pub fn select_window<'a>(
    records: &[&'a DailyRecord],
    window: &CircularWindow,
) -> Vec<&'a DailyRecord> {
    records
        .iter()
        .copied()
        .filter(|record| window.contains(record.day_of_year()))
        .collect()
}
