mod error;
mod frames;
mod observations;
mod profile;
mod render;
mod synoptic;
mod types;
mod utils;

pub use error::LoadProfileError;
pub use synoptic::*;

pub use profile::builder::{build_profile, build_profiles, profile_row, DEFAULT_WINDOW_RADIUS};
pub use profile::indexer::{day_of_year, index_date_strings, index_days, index_record, parse_date};
pub use profile::partition::{partition, partition_by_flag};
pub use profile::quantile::{interpolated_quantile, quantile_band};
pub use profile::window::{select_window, CircularWindow};

pub use types::cache_key::{CacheKey, CachePolicy};
pub use types::daily_record::{DailyLoadSeries, DailyRecord, DailyTotal};
pub use types::day_class::DayClass;
pub use types::into_utc_trait::IntoUtcDateTime;
pub use types::quantile_profile::{
    LoadProfiles, QuantileBand, QuantileProfile, DAYS_IN_PROFILE, QUANTILE_COLUMNS, QUANTILE_LEVELS,
};
pub use types::station::*;

pub use frames::daily_load::daily_totals_from_frame;
pub use frames::observation_frame::ObservationFrame;
pub use observations::data_loader::ObservationLoader;

pub use render::observation_chart::render_observations;
pub use render::profile_chart::{profile_date, render_profile, ProfileChartOptions};

pub use observations::error::ObservationError;
pub use profile::error::ProfileError;
pub use render::error::RenderError;
