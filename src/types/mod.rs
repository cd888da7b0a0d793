pub mod cache_key;
pub mod daily_record;
pub mod day_class;
pub mod into_utc_trait;
pub mod quantile_profile;
pub mod station;
