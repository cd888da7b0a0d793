//! The two day-of-week classes that get separate load profiles.

use std::fmt;

/// Binary partition of days used to build separate profiles.
///
/// The grouping keeps the historical convention of the load tables this crate
/// reproduces: `Weekday` covers Tuesday through Saturday and `Weekend` covers
/// Sunday and Monday. This is not the calendar's Monday–Friday split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayClass {
    /// Tuesday, Wednesday, Thursday, Friday, Saturday.
    Weekday,
    /// Sunday and Monday.
    Weekend,
}

impl DayClass {
    /// Days of week (0 = Monday .. 6 = Sunday) belonging to this class.
    pub fn days_of_week(self) -> &'static [u32] {
        match self {
            DayClass::Weekday => &[1, 2, 3, 4, 5],
            DayClass::Weekend => &[0, 6],
        }
    }

    pub fn contains(self, day_of_week: u32) -> bool {
        self.days_of_week().contains(&day_of_week)
    }

    /// Maps the boolean `weekday` flag onto a class.
    pub fn from_weekday_flag(weekday: bool) -> Self {
        if weekday {
            DayClass::Weekday
        } else {
            DayClass::Weekend
        }
    }
}

impl fmt::Display for DayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayClass::Weekday => write!(f, "weekday"),
            DayClass::Weekend => write!(f, "weekend"),
        }
    }
}
