//! Contains the `ObservationFrame` structure: hourly station observations as a Polars table.

use crate::frames::daily_load::daily_totals_from_frame;
use crate::observations::error::ObservationError;
use crate::profile::error::ProfileError;
use crate::profile::indexer::index_days;
use crate::types::daily_record::DailyLoadSeries;
use crate::types::station::StationObservations;
use chrono::{Duration, FixedOffset, NaiveDateTime, Timelike};
use log::debug;
use polars::prelude::*;

/// One point of the hourly grid.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HourlySample {
    date_time: NaiveDateTime,
    air_temp: Option<f64>,
    relative_humidity: Option<f64>,
}

/// Hourly observations of one station in local (fixed offset) time.
///
/// The wrapped frame always holds `date_time` (naive local datetime),
/// `air_temp` and `relative_humidity`. Further columns are added by
/// [`ObservationFrame::with_time_features`] (`hour`, `day_of_week`, `year`)
/// and [`ObservationFrame::with_load`] (`load`).
#[derive(Debug, Clone)]
pub struct ObservationFrame {
    /// The underlying Polars DataFrame.
    pub frame: DataFrame,
}

fn floor_hour(t: NaiveDateTime) -> NaiveDateTime {
    t.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

/// Resamples irregular samples (ascending by time) onto an hourly grid.
///
/// Every grid point from the hour of the first sample to the hour of the last
/// takes the values of the sample closest in time; ties go to the later one.
fn resample_nearest_hour(samples: &[HourlySample]) -> Vec<HourlySample> {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Vec::new();
    };
    let distance = |sample: &HourlySample, t: NaiveDateTime| (sample.date_time - t).num_seconds().abs();

    let mut grid = Vec::new();
    let mut idx = 0;
    let mut t = floor_hour(first.date_time);
    let end = floor_hour(last.date_time);
    while t <= end {
        while idx + 1 < samples.len() && samples[idx + 1].date_time <= t {
            idx += 1;
        }
        let mut nearest = &samples[idx];
        if let Some(next) = samples.get(idx + 1) {
            if distance(next, t) <= distance(nearest, t) {
                nearest = next;
            }
        }
        grid.push(HourlySample {
            date_time: t,
            ..*nearest
        });
        t += Duration::hours(1);
    }
    grid
}

impl ObservationFrame {
    /// Wraps an existing frame. It is expected to follow the column layout
    /// described on [`ObservationFrame`].
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Builds an hourly frame from retrieved observations.
    ///
    /// Timestamps are shifted to `offset` (e.g. UTC-5 for US Eastern standard
    /// time) and resampled to whole hours using the nearest observation.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError::NoObservations`] if there is nothing to resample,
    /// or [`ObservationError::DataFrameProcessing`] if the frame cannot be built.
    pub fn from_observations(
        observations: &StationObservations,
        offset: FixedOffset,
    ) -> Result<Self, ObservationError> {
        let samples: Vec<HourlySample> = observations
            .observations
            .iter()
            .map(|o| HourlySample {
                date_time: o.date_time.with_timezone(&offset).naive_local(),
                air_temp: o.air_temp,
                relative_humidity: o.relative_humidity,
            })
            .collect();
        let hourly = resample_nearest_hour(&samples);
        if hourly.is_empty() {
            return Err(ObservationError::NoObservations(
                observations.station.id.clone(),
            ));
        }
        if let Some((first, last)) = observations.time_span() {
            debug!(
                "Resampled {} observations of {} ({} to {}) onto {} hours",
                samples.len(),
                observations.station.id,
                first,
                last,
                hourly.len()
            );
        }

        let frame = df!(
            "date_time" => hourly.iter().map(|s| s.date_time).collect::<Vec<_>>(),
            "air_temp" => hourly.iter().map(|s| s.air_temp).collect::<Vec<_>>(),
            "relative_humidity" => hourly.iter().map(|s| s.relative_humidity).collect::<Vec<_>>(),
        )?;
        Ok(Self { frame })
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Adds `hour` (0..=23), `day_of_week` (0 = Monday .. 6 = Sunday) and `year`.
    pub fn with_time_features(self) -> PolarsResult<Self> {
        let frame = self
            .frame
            .lazy()
            .with_columns([
                col("date_time").dt().hour().cast(DataType::Int32).alias("hour"),
                (col("date_time").dt().weekday().cast(DataType::Int32) - lit(1i32))
                    .alias("day_of_week"),
                col("date_time").dt().year().alias("year"),
            ])
            .collect()?;
        Ok(Self { frame })
    }

    /// Attaches the externally estimated `load` value of every hour.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError::LoadLength`] if `load` does not have one
    /// value per row.
    pub fn with_load(mut self, load: &[f64]) -> Result<Self, ObservationError> {
        if load.len() != self.frame.height() {
            return Err(ObservationError::LoadLength {
                expected: self.frame.height(),
                found: load.len(),
            });
        }
        self.frame
            .with_column(Column::new("load".into(), load.to_vec()))?;
        Ok(self)
    }

    /// Returns a copy with `air_temp` shifted by `slope * (reference_year - year)`,
    /// so every year's temperatures are expressed at the reference year's climate.
    pub fn correct_for_climate_change(&self, slope: f64, reference_year: i32) -> PolarsResult<Self> {
        let years_before = (lit(reference_year) - col("date_time").dt().year()).cast(DataType::Float64);
        let frame = self
            .frame
            .clone()
            .lazy()
            .with_column((col("air_temp") + lit(slope) * years_before).alias("air_temp"))
            .collect()?;
        Ok(Self { frame })
    }

    /// Sum of `load` per calendar date, as a `date`/`load` frame sorted by date.
    pub fn daily_totals(&self) -> PolarsResult<DataFrame> {
        self.frame
            .clone()
            .lazy()
            .group_by([col("date_time").dt().date().alias("date")])
            .agg([col("load").sum()])
            .sort(["date"], SortMultipleOptions::default())
            .collect()
    }

    /// Daily totals indexed by day of year and day of week, ready for
    /// [`crate::build_profiles`].
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::Frame`] if `load` is missing, and
    /// [`ProfileError::MalformedInput`] for negative or non-finite totals.
    pub fn daily_load_series(&self) -> Result<DailyLoadSeries, ProfileError> {
        let totals = daily_totals_from_frame(&self.daily_totals()?)?;
        index_days(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::station::{Observation, QcSummary, StationAttributes};
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::collections::BTreeMap;

    fn est() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn observations(times: &[(u32, u32, u32)]) -> StationObservations {
        StationObservations {
            station: StationAttributes {
                id: "KNYC".to_string(),
                name: "Central Park".to_string(),
                elevation: Some(154.0),
                latitude: Some(40.78),
                longitude: Some(-73.97),
            },
            observations: times
                .iter()
                .enumerate()
                .map(|(i, &(d, h, m))| Observation {
                    date_time: Utc.with_ymd_and_hms(2018, 1, d, h, m, 0).unwrap(),
                    air_temp: Some(i as f64),
                    relative_humidity: Some(50.0 + i as f64),
                })
                .collect(),
            units: BTreeMap::new(),
            qc_summary: QcSummary::default(),
        }
    }

    fn local(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_resample_picks_nearest_sample() {
        let samples: Vec<HourlySample> = [(10, 51), (11, 51), (13, 10)]
            .iter()
            .enumerate()
            .map(|(i, &(h, m))| HourlySample {
                date_time: NaiveDate::from_ymd_opt(2018, 1, 1)
                    .unwrap()
                    .and_hms_opt(h, m, 0)
                    .unwrap(),
                air_temp: Some(i as f64),
                relative_humidity: None,
            })
            .collect();
        let grid = resample_nearest_hour(&samples);
        let hours: Vec<u32> = grid.iter().map(|s| s.date_time.hour()).collect();
        assert_eq!(hours, vec![10, 11, 12, 13]);
        let temps: Vec<Option<f64>> = grid.iter().map(|s| s.air_temp).collect();
        // 10:00 -> 10:51, 11:00 -> 10:51, 12:00 -> 11:51, 13:00 -> 13:10
        assert_eq!(temps, vec![Some(0.0), Some(0.0), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn test_resample_tie_takes_later_sample() {
        let samples: Vec<HourlySample> = [(10, 30), (11, 30)]
            .iter()
            .enumerate()
            .map(|(i, &(h, m))| HourlySample {
                date_time: NaiveDate::from_ymd_opt(2018, 1, 1)
                    .unwrap()
                    .and_hms_opt(h, m, 0)
                    .unwrap(),
                air_temp: Some(i as f64),
                relative_humidity: None,
            })
            .collect();
        let grid = resample_nearest_hour(&samples);
        let temps: Vec<Option<f64>> = grid.iter().map(|s| s.air_temp).collect();
        // 10:00 is only near 10:30; 11:00 is 30 minutes from both.
        assert_eq!(temps, vec![Some(0.0), Some(1.0)]);
    }

    #[test]
    fn test_from_observations_shifts_to_local_time() -> Result<(), Box<dyn std::error::Error>> {
        // 05:51 UTC is 00:51 EST.
        let obs = observations(&[(1, 5, 51), (1, 6, 51), (1, 7, 51)]);
        let frame = ObservationFrame::from_observations(&obs, est())?;
        assert_eq!(frame.height(), 3);
        let names: Vec<&str> = frame.frame.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["date_time", "air_temp", "relative_humidity"]);

        let features = frame.with_time_features()?;
        let hours: Vec<Option<i32>> = features.frame.column("hour")?.i32()?.into_iter().collect();
        assert_eq!(hours, vec![Some(0), Some(1), Some(2)]);
        Ok(())
    }

    #[test]
    fn test_empty_observations_are_rejected() {
        let obs = observations(&[]);
        assert!(matches!(
            ObservationFrame::from_observations(&obs, est()),
            Err(ObservationError::NoObservations(_))
        ));
    }

    #[test]
    fn test_time_features_day_of_week() -> Result<(), Box<dyn std::error::Error>> {
        // 2018-01-01 (Monday) through 2018-01-07 (Sunday) at noon.
        let frame = ObservationFrame::new(df!(
            "date_time" => (1..=7).map(|d| local(d, 12)).collect::<Vec<_>>(),
            "air_temp" => vec![Some(1.0f64); 7],
            "relative_humidity" => vec![Some(1.0f64); 7],
        )?)
        .with_time_features()?;
        let dow: Vec<Option<i32>> = frame.frame.column("day_of_week")?.i32()?.into_iter().collect();
        assert_eq!(dow, (0..7).map(Some).collect::<Vec<_>>());
        let years: Vec<Option<i32>> = frame.frame.column("year")?.i32()?.into_iter().collect();
        assert!(years.iter().all(|y| *y == Some(2018)));
        Ok(())
    }

    #[test]
    fn test_with_load_checks_length() -> Result<(), Box<dyn std::error::Error>> {
        let obs = observations(&[(1, 5, 0), (1, 6, 0)]);
        let frame = ObservationFrame::from_observations(&obs, est())?;
        match frame.clone().with_load(&[1.0]) {
            Err(ObservationError::LoadLength { expected, found }) => {
                assert_eq!((expected, found), (2, 1));
            }
            other => panic!("Expected LoadLength error, got {:?}", other.map(|f| f.frame)),
        }
        let with_load = frame.with_load(&[1.0, 2.0])?;
        assert_eq!(with_load.frame.column("load")?.f64()?.sum(), Some(3.0));
        Ok(())
    }

    #[test]
    fn test_climate_correction_leaves_original_untouched() -> Result<(), Box<dyn std::error::Error>> {
        let frame = ObservationFrame::new(df!(
            "date_time" => vec![local(1, 0)],
            "air_temp" => vec![Some(10.0f64)],
            "relative_humidity" => vec![Some(50.0f64)],
        )?);
        let corrected = frame.correct_for_climate_change(0.05, 2020)?;
        let temp = corrected.frame.column("air_temp")?.f64()?.get(0).unwrap();
        assert!((temp - 10.1).abs() < 1e-9);
        assert_eq!(frame.frame.column("air_temp")?.f64()?.get(0), Some(10.0));
        Ok(())
    }

    #[test]
    fn test_daily_load_series_sums_per_local_day() -> Result<(), Box<dyn std::error::Error>> {
        // Two local days of hourly data, each hour carrying load 100.
        let times: Vec<NaiveDateTime> = (0..48).map(|h| local(1, 0) + Duration::hours(h)).collect();
        let frame = ObservationFrame::new(df!(
            "date_time" => times,
            "air_temp" => vec![Some(0.0f64); 48],
            "relative_humidity" => vec![Some(0.0f64); 48],
        )?)
        .with_load(&[100.0; 48])?;

        let series = frame.daily_load_series()?;
        assert_eq!(series.len(), 2);
        let first = series.records()[0];
        assert_eq!(first.date(), NaiveDate::from_ymd_opt(2018, 1, 1).unwrap());
        assert_eq!(first.load(), 2400.0);
        assert_eq!(first.day_of_year(), 1);
        assert_eq!(first.day_of_week(), 0);
        Ok(())
    }

    #[test]
    fn test_daily_load_series_rejects_negative_totals() -> Result<(), Box<dyn std::error::Error>> {
        let frame = ObservationFrame::new(df!(
            "date_time" => vec![local(1, 0), local(1, 1)],
            "air_temp" => vec![Some(0.0f64); 2],
            "relative_humidity" => vec![Some(0.0f64); 2],
        )?)
        .with_load(&[-5.0, 1.0])?;
        assert!(matches!(
            frame.daily_load_series(),
            Err(ProfileError::MalformedInput { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_daily_load_series_requires_load_column() -> Result<(), Box<dyn std::error::Error>> {
        let frame = ObservationFrame::new(df!(
            "date_time" => vec![local(1, 0)],
            "air_temp" => vec![Some(0.0f64)],
            "relative_humidity" => vec![Some(0.0f64)],
        )?);
        assert!(matches!(frame.daily_load_series(), Err(ProfileError::Frame(_))));
        Ok(())
    }
}
