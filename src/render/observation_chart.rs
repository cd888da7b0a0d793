//! Three stacked time series panels: temperature, relative humidity and load.

use crate::frames::observation_frame::ObservationFrame;
use crate::render::error::{drawing_error, RenderError};
use crate::render::series::{contiguous_runs, value_range};
use chrono::{DateTime, NaiveDateTime};
use log::info;
use plotters::prelude::*;
use polars::prelude::*;
use std::path::Path;

const LOAD_RANGE: (f64, f64) = (0.0, 10_000.0);

struct Panel {
    column: &'static str,
    label: &'static str,
    color: RGBColor,
    fixed_range: Option<(f64, f64)>,
}

const PANELS: [Panel; 3] = [
    Panel {
        column: "air_temp",
        label: "Temperature (C)",
        color: RED,
        fixed_range: None,
    },
    Panel {
        column: "relative_humidity",
        label: "Relative Humidity (%)",
        color: GREEN,
        fixed_range: None,
    },
    Panel {
        column: "load",
        label: "Electricity load (MWh)",
        color: BLACK,
        fixed_range: Some(LOAD_RANGE),
    },
];

/// `date_time` as fractional hours since the Unix epoch.
fn hours_since_epoch(frame: &DataFrame) -> Result<Vec<Option<f64>>, RenderError> {
    let column = frame.column("date_time")?;
    let per_hour = match column.dtype() {
        DataType::Datetime(TimeUnit::Milliseconds, _) => 3.6e6,
        DataType::Datetime(TimeUnit::Microseconds, _) => 3.6e9,
        DataType::Datetime(TimeUnit::Nanoseconds, _) => 3.6e12,
        other => {
            return Err(RenderError::UnexpectedColumnType {
                column: "date_time".to_string(),
                dtype: other.to_string(),
            })
        }
    };
    let raw = column.cast(&DataType::Int64)?;
    Ok(raw
        .i64()?
        .into_iter()
        .map(|v| v.map(|v| v as f64 / per_hour))
        .collect())
}

fn time_label(hours: f64) -> String {
    DateTime::from_timestamp((hours * 3600.0) as i64, 0)
        .map(|dt| dt.naive_utc())
        .map(|dt: NaiveDateTime| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Draws air temperature, relative humidity and load against time into an SVG
/// file at `path`. The frame must contain a `load` column.
///
/// # Errors
///
/// Returns [`RenderError::EmptyFrame`] for a frame without rows,
/// [`RenderError::Frame`] if a column is missing, and [`RenderError::Drawing`]
/// on backend failures.
pub fn render_observations(frame: &ObservationFrame, path: &Path) -> Result<(), RenderError> {
    let times = hours_since_epoch(&frame.frame)?;
    let (t0, t1) = value_range(times.iter().flatten().copied()).ok_or(RenderError::EmptyFrame)?;

    let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;
    let areas = root.split_evenly((PANELS.len(), 1));

    for (area, panel) in areas.iter().zip(PANELS.iter()) {
        let values = frame.frame.column(panel.column)?.cast(&DataType::Float64)?;
        let points: Vec<(f64, Option<f64>)> = times
            .iter()
            .zip(values.f64()?.into_iter())
            .filter_map(|(t, v)| t.map(|t| (t, v)))
            .collect();
        let (y0, y1) = panel
            .fixed_range
            .or_else(|| value_range(points.iter().filter_map(|(_, v)| *v)))
            .unwrap_or((0.0, 1.0));

        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .build_cartesian_2d(t0..t1, y0..y1)
            .map_err(drawing_error)?;
        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc(panel.label)
            .x_label_formatter(&|x| time_label(*x))
            .draw()
            .map_err(drawing_error)?;

        for run in contiguous_runs(points) {
            chart
                .draw_series(LineSeries::new(
                    run.into_iter().map(|(t, v)| (t, v.clamp(y0, y1))),
                    &panel.color,
                ))
                .map_err(drawing_error)?;
        }
    }

    root.present().map_err(drawing_error)?;
    info!(
        "Wrote observation chart with {} rows to {}",
        frame.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn frame(rows: usize) -> Result<ObservationFrame, Box<dyn std::error::Error>> {
        let start = NaiveDate::from_ymd_opt(2018, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let times: Vec<NaiveDateTime> = (0..rows as i64).map(|h| start + Duration::hours(h)).collect();
        let temps: Vec<Option<f64>> = (0..rows).map(|i| (i != 3).then_some(i as f64)).collect();
        let humidity = vec![Some(60.0f64); rows];
        let obs = ObservationFrame::new(df!(
            "date_time" => times,
            "air_temp" => temps,
            "relative_humidity" => humidity,
        )?);
        Ok(obs.with_load(&vec![5_000.0; rows])?)
    }

    #[test]
    fn test_hours_since_epoch() -> Result<(), Box<dyn std::error::Error>> {
        let hours = hours_since_epoch(&frame(2)?.frame)?;
        // 2018-01-01T00:00 is 17532 days after the epoch.
        assert_eq!(hours, vec![Some(17_532.0 * 24.0), Some(17_532.0 * 24.0 + 1.0)]);
        assert_eq!(time_label(17_532.0 * 24.0 + 5.0), "2018-01-01");
        Ok(())
    }

    #[test]
    fn test_render_observations_writes_three_panels() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("observations.svg");
        render_observations(&frame(48)?, &path)?;
        let svg = std::fs::read_to_string(&path)?.to_uppercase();
        assert!(svg.contains("<SVG"));
        assert!(svg.contains("#FF0000"));
        assert!(svg.contains("#00FF00"));
        Ok(())
    }

    #[test]
    fn test_render_empty_frame_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let empty = ObservationFrame::new(frame(4)?.frame.head(Some(0)));
        let result = render_observations(&empty, &dir.path().join("x.svg"));
        assert!(matches!(result, Err(RenderError::EmptyFrame)));
        Ok(())
    }

    #[test]
    fn test_render_requires_load() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let mut obs = frame(4)?;
        obs.frame = obs.frame.drop("load")?;
        let result = render_observations(&obs, &dir.path().join("x.svg"));
        assert!(matches!(result, Err(RenderError::Frame(_))));
        Ok(())
    }
}
