//! Wire format of the SynopticLabs auth and timeseries endpoints, and its
//! conversion into [`StationObservations`].

use crate::observations::error::ObservationError;
use crate::types::station::{Observation, QcSummary, StationAttributes, StationObservations};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Variables requested from the timeseries endpoint, besides `date_time`.
pub(crate) const REQUESTED_VARIABLES: [&str; 2] = ["air_temp", "relative_humidity"];

const RESPONSE_OK: i64 = 1;

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(rename = "TOKEN")]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) struct TimeseriesResponse {
    summary: ResponseSummary,
    #[serde(default)]
    station: Vec<RawStation>,
    #[serde(default)]
    units: HashMap<String, Value>,
    #[serde(default)]
    qc_summary: Option<RawQcSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ResponseSummary {
    response_code: i64,
    #[serde(default)]
    response_message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RawStation {
    stid: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    elevation: Value,
    #[serde(default)]
    latitude: Value,
    #[serde(default)]
    longitude: Value,
    #[serde(default)]
    sensor_variables: BTreeMap<String, BTreeMap<String, Value>>,
    #[serde(default)]
    observations: HashMap<String, Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RawQcSummary {
    #[serde(default)]
    qc_checks_applied: Vec<String>,
    #[serde(default)]
    total_observations_flagged: Value,
    #[serde(default)]
    percent_of_total_observations_flagged: Value,
}

/// Numbers are sometimes sent as JSON strings ("154" rather than 154).
fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn unit_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl TimeseriesResponse {
    /// Checks the response summary and extracts the first station.
    pub(crate) fn into_observations(
        self,
        station_id: &str,
    ) -> Result<StationObservations, ObservationError> {
        if self.summary.response_code != RESPONSE_OK {
            return Err(ObservationError::Api {
                station: station_id.to_string(),
                code: self.summary.response_code,
                message: self.summary.response_message,
            });
        }
        let raw = self
            .station
            .into_iter()
            .next()
            .ok_or_else(|| ObservationError::StationNotFound(station_id.to_string()))?;

        let station = StationAttributes {
            id: raw.stid.clone(),
            name: raw.name.clone(),
            elevation: lenient_f64(&raw.elevation),
            latitude: lenient_f64(&raw.latitude),
            longitude: lenient_f64(&raw.longitude),
        };
        let observations = raw.extract_observations()?;
        let units = self
            .units
            .iter()
            .map(|(name, unit)| (name.clone(), unit_text(unit)))
            .collect();
        let qc_summary = self
            .qc_summary
            .map(|qc| QcSummary {
                checks_applied: qc.qc_checks_applied,
                total_observations_flagged: lenient_f64(&qc.total_observations_flagged)
                    .unwrap_or_default(),
                percent_observations_flagged: lenient_f64(
                    &qc.percent_of_total_observations_flagged,
                )
                .unwrap_or_default(),
            })
            .unwrap_or_default();

        Ok(StationObservations {
            station,
            observations,
            units,
            qc_summary,
        })
    }
}

impl RawStation {
    /// Name of the observation series holding `variable`, e.g. `air_temp_set_1`.
    ///
    /// Stations with several sensors for a variable list them all; the first
    /// set is used.
    fn series_name(&self, variable: &str) -> Result<&str, ObservationError> {
        self.sensor_variables
            .get(variable)
            .and_then(|sets| sets.keys().next())
            .map(String::as_str)
            .ok_or_else(|| ObservationError::MissingVariable {
                station: self.stid.clone(),
                variable: variable.to_string(),
            })
    }

    fn series(&self, name: &str, expected: usize) -> Result<Vec<Option<f64>>, ObservationError> {
        let values = self.observations.get(name).ok_or_else(|| {
            ObservationError::MissingVariable {
                station: self.stid.clone(),
                variable: name.to_string(),
            }
        })?;
        if values.len() != expected {
            return Err(ObservationError::SeriesLength {
                series: name.to_string(),
                expected,
                found: values.len(),
            });
        }
        Ok(values.iter().map(lenient_f64).collect())
    }

    fn extract_observations(&self) -> Result<Vec<Observation>, ObservationError> {
        let timestamps = self
            .observations
            .get("date_time")
            .ok_or_else(|| ObservationError::MissingVariable {
                station: self.stid.clone(),
                variable: "date_time".to_string(),
            })?
            .iter()
            .map(|value| {
                let text = unit_text(value);
                DateTime::parse_from_rfc3339(&text)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| ObservationError::Timestamp(text, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let [temp_var, rh_var] = REQUESTED_VARIABLES;
        let air_temp = self.series(self.series_name(temp_var)?, timestamps.len())?;
        let relative_humidity = self.series(self.series_name(rh_var)?, timestamps.len())?;

        let mut observations: Vec<Observation> = timestamps
            .into_iter()
            .zip(air_temp)
            .zip(relative_humidity)
            .map(|((date_time, air_temp), relative_humidity)| Observation {
                date_time,
                air_temp,
                relative_humidity,
            })
            .collect();
        observations.sort_by_key(|o| o.date_time);
        Ok(observations)
    }
}
