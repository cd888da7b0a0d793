//! The main entry point for retrieving station observations from the
//! SynopticLabs (MesoWest) timeseries service.

use crate::error::LoadProfileError;
use crate::frames::observation_frame::ObservationFrame;
use crate::observations::data_loader::ObservationLoader;
use crate::types::cache_key::{CacheKey, CachePolicy};
use crate::types::into_utc_trait::IntoUtcDateTime;
use crate::types::station::StationObservations;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use chrono::FixedOffset;
use std::path::PathBuf;

/// Client for the SynopticLabs timeseries API with an on-disk cache.
///
/// Every request is identified by a [`CacheKey`] (station plus UTC time range).
/// Responses are stored in the cache folder and reused according to the
/// [`CachePolicy`] of the request.
///
/// # Examples
///
/// ```rust,no_run
/// # use load_profile::{SynopticClient, LoadProfileError};
/// # async fn run() -> Result<(), LoadProfileError> {
/// let client = SynopticClient::new("my-api-key").await?;
/// # Ok(())
/// # }
/// ```
pub struct SynopticClient {
    loader: ObservationLoader,
}

#[bon]
impl SynopticClient {
    /// Creates a client that caches responses in `cache_folder`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadProfileError::CacheDirCreation`] if the folder cannot be created.
    pub async fn with_cache_folder(
        api_key: &str,
        cache_folder: PathBuf,
    ) -> Result<Self, LoadProfileError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| LoadProfileError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            loader: ObservationLoader::new(&cache_folder, api_key),
        })
    }

    /// Creates a client using the default cache directory
    /// (e.g. `~/.cache/load_profile_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`LoadProfileError::CacheDirResolution`] if there is no system cache
    /// directory, or [`LoadProfileError::CacheDirCreation`] if it cannot be created.
    pub async fn new(api_key: &str) -> Result<Self, LoadProfileError> {
        let cache_folder = get_cache_dir().map_err(LoadProfileError::CacheDirResolution)?;
        Self::with_cache_folder(api_key, cache_folder).await
    }

    /// Points the client at another deployment of the API (e.g. a proxy).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.loader = self.loader.with_base_url(base_url);
        self
    }

    /// Retrieves air temperature and relative humidity observations of one station.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.station(&str)`: **Required.** Station identifier, e.g. `"KNYC"` (case-insensitive).
    /// * `.start(impl IntoUtcDateTime)`: **Required.** Start of the range. Naive values are UTC.
    /// * `.end(impl IntoUtcDateTime)`: **Required.** End of the range.
    /// * `.cache_policy(CachePolicy)`: Optional. Defaults to [`CachePolicy::PreferCache`].
    ///
    /// # Errors
    ///
    /// Returns [`LoadProfileError::Observation`] for cache, network, HTTP or API failures,
    /// and for a cache miss under [`CachePolicy::CacheOnly`].
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use load_profile::{SynopticClient, LoadProfileError};
    /// # use chrono::NaiveDate;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), LoadProfileError> {
    /// let client = SynopticClient::new("my-api-key").await?;
    /// let observations = client
    ///     .observations()
    ///     .station("KNYC")
    ///     .start(NaiveDate::from_ymd_opt(2018, 1, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2018, 2, 1).unwrap())
    ///     .call()
    ///     .await?;
    /// println!("{} observations from {}", observations.observations.len(), observations.station.name);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn observations(
        &self,
        station: &str,
        start: impl IntoUtcDateTime,
        end: impl IntoUtcDateTime,
        cache_policy: Option<CachePolicy>,
    ) -> Result<StationObservations, LoadProfileError> {
        let key = CacheKey::new(
            station,
            start.into_utc().naive_utc(),
            end.into_utc().naive_utc(),
        );
        Ok(self
            .loader
            .retrieve(&key, cache_policy.unwrap_or_default())
            .await?)
    }

    /// Retrieves observations like [`SynopticClient::observations`] and turns them
    /// into an hourly [`ObservationFrame`] in the local time of `utc_offset`.
    ///
    /// # Errors
    ///
    /// Everything [`SynopticClient::observations`] returns, plus
    /// [`LoadProfileError::Observation`] if the station reported no observations.
    #[builder]
    pub async fn observation_frame(
        &self,
        station: &str,
        start: impl IntoUtcDateTime,
        end: impl IntoUtcDateTime,
        utc_offset: FixedOffset,
        cache_policy: Option<CachePolicy>,
    ) -> Result<ObservationFrame, LoadProfileError> {
        let observations = self
            .observations()
            .station(station)
            .start(start.into_utc())
            .end(end.into_utc())
            .maybe_cache_policy(cache_policy)
            .call()
            .await?;
        Ok(ObservationFrame::from_observations(&observations, utc_offset)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::error::ObservationError;
    use crate::observations::response::tests::SAMPLE_RESPONSE;
    use crate::observations::response::TimeseriesResponse;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, d).unwrap()
    }

    async fn offline_client(dir: &std::path::Path) -> Result<SynopticClient, LoadProfileError> {
        // Nothing listens on the discard port, so any download attempt fails fast.
        Ok(SynopticClient::with_cache_folder("unused", dir.join("cache"))
            .await?
            .with_base_url("http://127.0.0.1:9"))
    }

    async fn seed_cache(client: &SynopticClient) -> Result<StationObservations, Box<dyn std::error::Error>> {
        let response: TimeseriesResponse = serde_json::from_str(SAMPLE_RESPONSE)?;
        let observations = response.into_observations("knyc")?;
        let key = CacheKey::new("KNYC", day(1).into_utc().naive_utc(), day(2).into_utc().naive_utc());
        ObservationLoader::write_cache(&observations, &client.loader.cache_path(&key)).await?;
        Ok(observations)
    }

    #[tokio::test]
    async fn test_with_cache_folder_creates_directory() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        offline_client(dir.path()).await?;
        assert!(dir.path().join("cache").is_dir());
        Ok(())
    }

    #[tokio::test]
    async fn test_observations_served_from_cache() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let client = offline_client(dir.path()).await?;
        let expected = seed_cache(&client).await?;

        let observations = client
            .observations()
            .station("KNYC")
            .start(day(1))
            .end(day(2))
            .cache_policy(CachePolicy::CacheOnly)
            .call()
            .await?;
        assert_eq!(observations, expected);

        // The default policy also prefers the cached copy.
        let observations = client
            .observations()
            .station("knyc")
            .start(day(1))
            .end(day(2))
            .call()
            .await?;
        assert_eq!(observations, expected);
        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_bypasses_cache() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let client = offline_client(dir.path()).await?;
        seed_cache(&client).await?;

        let result = client
            .observations()
            .station("KNYC")
            .start(day(1))
            .end(day(2))
            .cache_policy(CachePolicy::Refresh)
            .call()
            .await;
        assert!(matches!(
            result,
            Err(LoadProfileError::Observation(ObservationError::NetworkRequest(..)))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_observation_frame_from_cache() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let client = offline_client(dir.path()).await?;
        seed_cache(&client).await?;

        let frame = client
            .observation_frame()
            .station("KNYC")
            .start(day(1))
            .end(day(2))
            .utc_offset(FixedOffset::west_opt(5 * 3600).unwrap())
            .cache_policy(CachePolicy::CacheOnly)
            .call()
            .await?;
        assert!(frame.height() > 0);
        assert!(frame.frame.column("air_temp").is_ok());
        Ok(())
    }
}
