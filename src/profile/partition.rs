use crate::types::daily_record::{DailyLoadSeries, DailyRecord};
use crate::types::day_class::DayClass;

/// Records of `series` whose day of week belongs to `class`, in date order.
pub fn partition(series: &DailyLoadSeries, class: DayClass) -> Vec<&DailyRecord> {
    series
        .iter()
        .filter(|record| class.contains(record.day_of_week()))
        .collect()
}

/// Same as [`partition`], selecting the class with a boolean flag
/// (`true` for the weekday class).
pub fn partition_by_flag(series: &DailyLoadSeries, weekday: bool) -> Vec<&DailyRecord> {
    partition(series, DayClass::from_weekday_flag(weekday))
}
