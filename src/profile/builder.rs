//! Builds the weekday and weekend quantile profiles from a daily load series.

use crate::profile::error::ProfileError;
use crate::profile::partition::partition;
use crate::profile::quantile::quantile_band;
use crate::profile::window::{select_window, CircularWindow};
use crate::types::daily_record::{DailyLoadSeries, DailyRecord};
use crate::types::day_class::DayClass;
use crate::types::quantile_profile::{LoadProfiles, QuantileBand, QuantileProfile, DAYS_IN_PROFILE};
use bon::builder;
use log::{debug, info, warn};
use rayon::prelude::*;

/// Window radius used when none is given.
pub const DEFAULT_WINDOW_RADIUS: i32 = 7;

/// Quantile band of the loads in `records` that fall inside `window`.
///
/// `records` is expected to be a single [`DayClass`] partition. Returns `None`
/// when the window selects nothing.
pub fn profile_row(records: &[&DailyRecord], window: &CircularWindow) -> Option<QuantileBand> {
    let loads = select_window(records, window)
        .into_iter()
        .map(DailyRecord::load)
        .collect();
    quantile_band(loads)
}

/// Builds the 365-day profile for one day class.
///
/// # Errors
///
/// Returns [`ProfileError::InvalidWindowRadius`] if `window_radius` is negative.
pub fn build_profile(
    series: &DailyLoadSeries,
    class: DayClass,
    window_radius: i32,
) -> Result<QuantileProfile, ProfileError> {
    let windows = (1..=DAYS_IN_PROFILE)
        .map(|day| CircularWindow::new(day, window_radius))
        .collect::<Result<Vec<_>, _>>()?;
    let records = partition(series, class);
    debug!(
        "Building {} profile from {} of {} records with window radius {}",
        class,
        records.len(),
        series.len(),
        window_radius
    );

    let rows: Vec<Option<QuantileBand>> = windows
        .par_iter()
        .map(|window| profile_row(&records, window))
        .collect();

    let profile = QuantileProfile::new(class, window_radius.unsigned_abs(), rows);
    let missing = profile.missing_days();
    if !missing.is_empty() {
        warn!(
            "{} profile has {} day(s) with an empty window, first missing day is {}",
            class,
            missing.len(),
            missing[0]
        );
    }
    Ok(profile)
}

/// Builds both day-class profiles from `series`.
///
/// Every day of year 1..=365 gets a row in each profile. Days whose window
/// sample is empty are left missing instead of failing the whole build.
///
/// # Errors
///
/// Returns [`ProfileError::InvalidWindowRadius`] if `window_radius` is negative.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use load_profile::{build_profiles, index_days, DailyTotal};
///
/// let start = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
/// let series = index_days(
///     (0..3 * 365).map(|i| DailyTotal::new(start + Duration::days(i), 100.0).unwrap()),
/// )
/// .unwrap();
///
/// let profiles = build_profiles().series(&series).window_radius(7).call().unwrap();
/// assert_eq!(profiles.weekday.get(1).unwrap().q50, 100.0);
/// ```
#[builder]
pub fn build_profiles(
    series: &DailyLoadSeries,
    window_radius: Option<i32>,
) -> Result<LoadProfiles, ProfileError> {
    let window_radius = window_radius.unwrap_or(DEFAULT_WINDOW_RADIUS);
    if window_radius < 0 {
        return Err(ProfileError::InvalidWindowRadius(window_radius));
    }
    let (weekday, weekend) = rayon::join(
        || build_profile(series, DayClass::Weekday, window_radius),
        || build_profile(series, DayClass::Weekend, window_radius),
    );
    let profiles = LoadProfiles {
        weekday: weekday?,
        weekend: weekend?,
    };
    info!(
        "Built load profiles from {} daily records (window radius {})",
        series.len(),
        window_radius
    );
    Ok(profiles)
}
