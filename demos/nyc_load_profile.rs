use chrono::{FixedOffset, NaiveDate};
use load_profile::{
    build_profiles, render_observations, render_profile, CachePolicy, DayClass, LoadProfileError,
    ProfileChartOptions, SynopticClient,
};
use polars::prelude::*;
use std::env;
use std::path::Path;

/// Hourly load that grows with heating and cooling demand around 18 C.
fn synthetic_load(air_temp: Option<f64>) -> f64 {
    let t = air_temp.unwrap_or(18.0);
    4_000.0 + 150.0 * (t - 18.0).abs()
}

#[tokio::main]
async fn main() -> Result<(), LoadProfileError> {
    configure_polars_display();
    let api_key = env::var("SYNOPTIC_API_KEY").unwrap_or_default();
    let client = SynopticClient::new(&api_key).await?;
    let est = FixedOffset::west_opt(5 * 3600).unwrap();

    let frame = client
        .observation_frame()
        .station("KNYC")
        .start(NaiveDate::from_ymd_opt(2016, 1, 1).unwrap())
        .end(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap())
        .utc_offset(est)
        .cache_policy(CachePolicy::PreferCache)
        .call()
        .await?
        .correct_for_climate_change(0.03, 2020)?
        .with_time_features()?;

    let load: Vec<f64> = frame
        .frame
        .column("air_temp")?
        .f64()?
        .into_iter()
        .map(synthetic_load)
        .collect();
    let frame = frame.with_load(&load)?;
    println!("{}", frame.frame.head(Some(5)));
    render_observations(&frame, Path::new("observations.svg"))?;

    let series = frame.daily_load_series()?;
    let profiles = build_profiles().series(&series).window_radius(7).call()?;
    println!("{}", profiles.weekday.to_dataframe()?.head(Some(10)));

    let options = ProfileChartOptions::builder()
        .y_range((0.0, 250_000.0))
        .y_label("Synthetic daily load (MWh)")
        .build();
    for class in [DayClass::Weekday, DayClass::Weekend] {
        let path = format!("{}_profile.svg", class);
        render_profile(profiles.get(class), Path::new(&path), &options)?;
        println!("Wrote {}", path);
    }
    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
