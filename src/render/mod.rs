pub mod error;
pub mod observation_chart;
pub mod profile_chart;
pub(crate) mod series;
