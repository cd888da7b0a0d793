//! Station metadata and observation records returned by the SynopticLabs
//! timeseries service, in the shape they are cached on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identification and location of an observing station.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StationAttributes {
    /// Station identifier as reported by the service (e.g., "KNYC").
    pub id: String,
    /// Human readable station name.
    pub name: String,
    /// Elevation in the unit given by [`StationObservations::units`] (`"elevation"`), if reported.
    pub elevation: Option<f64>,
    /// Latitude in decimal degrees, if reported.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, if reported.
    pub longitude: Option<f64>,
}

/// A single timestamped observation. Sensors that did not report are `None`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date_time: DateTime<Utc>,
    pub air_temp: Option<f64>,
    pub relative_humidity: Option<f64>,
}

/// Quality-control summary attached to a timeseries response.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct QcSummary {
    /// Names of the QC checks the service ran.
    pub checks_applied: Vec<String>,
    pub total_observations_flagged: f64,
    pub percent_observations_flagged: f64,
}

/// Everything retrieved for one station and date range.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StationObservations {
    pub station: StationAttributes,
    /// Observations in ascending time order.
    pub observations: Vec<Observation>,
    /// Unit per variable, e.g. `"air_temp" => "Celsius"`.
    pub units: BTreeMap<String, String>,
    pub qc_summary: QcSummary,
}

impl StationObservations {
    /// First and last observation time, if any observations exist.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((
            self.observations.first()?.date_time,
            self.observations.last()?.date_time,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn observations(hours: &[u32]) -> StationObservations {
        StationObservations {
            station: StationAttributes {
                id: "KNYC".to_string(),
                name: "Central Park".to_string(),
                elevation: None,
                latitude: None,
                longitude: None,
            },
            observations: hours
                .iter()
                .map(|&h| Observation {
                    date_time: Utc.with_ymd_and_hms(2018, 1, 1, h, 51, 0).unwrap(),
                    air_temp: None,
                    relative_humidity: None,
                })
                .collect(),
            units: BTreeMap::new(),
            qc_summary: QcSummary::default(),
        }
    }

    #[test]
    fn test_time_span() {
        let span = observations(&[5, 6, 9]).time_span();
        assert_eq!(
            span,
            Some((
                Utc.with_ymd_and_hms(2018, 1, 1, 5, 51, 0).unwrap(),
                Utc.with_ymd_and_hms(2018, 1, 1, 9, 51, 0).unwrap()
            ))
        );
        assert_eq!(observations(&[]).time_span(), None);
    }
}
