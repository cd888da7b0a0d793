//! SVG rendering of a quantile profile: median line over two shaded percentile bands.

use crate::render::error::{drawing_error, RenderError};
use crate::render::series::contiguous_runs;
use crate::types::quantile_profile::{QuantileBand, QuantileProfile, DAYS_IN_PROFILE};
use bon::Builder;
use chrono::{Duration, NaiveDate};
use log::info;
use plotters::prelude::*;
use std::path::Path;

const BAND_GREY: RGBColor = RGBColor(128, 128, 128);

/// Appearance of a profile chart.
///
/// # Examples
///
/// ```
/// use load_profile::ProfileChartOptions;
///
/// let options = ProfileChartOptions::builder().reference_year(2021).build();
/// assert_eq!(options.y_range, (60_000.0, 175_000.0));
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ProfileChartOptions {
    /// Year whose calendar labels the day-of-year axis.
    #[builder(default = 2020)]
    pub reference_year: i32,
    /// Fixed y axis range; values outside are clipped to it.
    #[builder(default = (60_000.0, 175_000.0))]
    pub y_range: (f64, f64),
    #[builder(into, default = String::from("NYC daily electricity demand (MWh)"))]
    pub y_label: String,
    /// Output size in pixels.
    #[builder(default = (1000, 400))]
    pub size: (u32, u32),
}

impl Default for ProfileChartOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Calendar date of `day_of_year` in `reference_year` (day 1 is January 1st).
pub fn profile_date(reference_year: i32, day_of_year: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(reference_year, 1, 1)?;
    first.checked_add_signed(Duration::days(i64::from(day_of_year) - 1))
}

fn axis_label(reference_year: i32, x: f64) -> String {
    profile_date(reference_year, x.round().max(1.0) as u32)
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_default()
}

fn band_polygon(
    run: &[(f64, QuantileBand)],
    lower: fn(&QuantileBand) -> f64,
    upper: fn(&QuantileBand) -> f64,
    clip: impl Fn(f64) -> f64,
) -> Vec<(f64, f64)> {
    run.iter()
        .map(|(x, band)| (*x, clip(upper(band))))
        .chain(run.iter().rev().map(|(x, band)| (*x, clip(lower(band)))))
        .collect()
}

/// Draws `profile` to an SVG file at `path`.
///
/// The 1st–99th percentile band is drawn lightest, the 5th–95th band on top
/// of it and the median as a red line. Days without data leave gaps.
///
/// # Errors
///
/// Returns [`RenderError::EmptyProfile`] if no day has data, and
/// [`RenderError::Drawing`] if the backend fails (e.g. the file cannot be written).
pub fn render_profile(
    profile: &QuantileProfile,
    path: &Path,
    options: &ProfileChartOptions,
) -> Result<(), RenderError> {
    let runs = contiguous_runs(profile.iter().map(|(day, band)| (f64::from(day), band.copied())));
    if runs.is_empty() {
        return Err(RenderError::EmptyProfile(profile.class()));
    }
    let (y0, y1) = options.y_range;
    let clip = |v: f64| v.clamp(y0, y1);
    let reference_year = options.reference_year;

    let root = SVGBackend::new(path, options.size).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(format!("{} load profile", profile.class()), ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(1f64..f64::from(DAYS_IN_PROFILE), y0..y1)
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(options.y_label.as_str())
        .x_label_formatter(&|x| axis_label(reference_year, *x))
        .draw()
        .map_err(drawing_error)?;

    for run in &runs {
        chart
            .draw_series(std::iter::once(Polygon::new(
                band_polygon(run, |b| b.q01, |b| b.q99, clip),
                BAND_GREY.mix(0.25).filled(),
            )))
            .map_err(drawing_error)?;
        chart
            .draw_series(std::iter::once(Polygon::new(
                band_polygon(run, |b| b.q05, |b| b.q95, clip),
                BAND_GREY.mix(0.3).filled(),
            )))
            .map_err(drawing_error)?;
        chart
            .draw_series(LineSeries::new(
                run.iter().map(|(x, band)| (*x, clip(band.q50))),
                &RED,
            ))
            .map_err(drawing_error)?;
    }

    root.present().map_err(drawing_error)?;
    info!("Wrote {} profile chart to {}", profile.class(), path.display());
    Ok(())
}
