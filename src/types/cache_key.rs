//! Identifies cached observation sets and controls when the cache is used.

use chrono::NaiveDateTime;
use std::fmt;

/// Timestamp format the timeseries service expects for `start`/`end`.
pub(crate) const API_TIME_FORMAT: &str = "%Y%m%d%H%M";

/// Station and UTC time range of one observation request.
///
/// The same key always maps to the same cache file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub station_id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CacheKey {
    pub fn new(station_id: &str, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            station_id: station_id.to_lowercase(),
            start,
            end,
        }
    }

    pub(crate) fn api_start(&self) -> String {
        self.start.format(API_TIME_FORMAT).to_string()
    }

    pub(crate) fn api_end(&self) -> String {
        self.end.format(API_TIME_FORMAT).to_string()
    }

    /// Name of the cache file for this key.
    pub fn file_name(&self) -> String {
        format!(
            "wxobs_{}_{}_{}.bin",
            self.station_id,
            self.api_start(),
            self.api_end()
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}..{}",
            self.station_id,
            self.api_start(),
            self.api_end()
        )
    }
}

/// When to read from and write to the observation cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Load from the cache if present, otherwise fetch and store.
    #[default]
    PreferCache,
    /// Always fetch and overwrite the cached copy.
    Refresh,
    /// Never touch the network. A missing cache file is an error.
    CacheOnly,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_file_name_uses_api_timestamps() {
        let start = NaiveDate::from_ymd_opt(2018, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2018, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let key = CacheKey::new("KNYC", start, end);
        assert_eq!(key.station_id, "knyc");
        assert_eq!(key.file_name(), "wxobs_knyc_201801010000_201801020000.bin");
        assert_eq!(key.to_string(), "knyc 201801010000..201801020000");
    }
}
