use crate::observations::error::ObservationError;
use crate::observations::response::{TimeseriesResponse, TokenResponse, REQUESTED_VARIABLES};
use crate::types::cache_key::{CacheKey, CachePolicy};
use crate::types::station::StationObservations;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::{debug, info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::{fs, task};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.mesowest.net/v2";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

fn partial_cache_path(cache_path: &Path) -> PathBuf {
    let mut name = cache_path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    cache_path.with_file_name(name)
}

/// Loads station observations from the cache folder, fetching them from the
/// SynopticLabs API when needed.
pub struct ObservationLoader {
    cache_dir: PathBuf,
    base_url: String,
    api_key: String,
    download_client: Client,
}

impl ObservationLoader {
    pub fn new(cache_dir: &Path, api_key: &str) -> ObservationLoader {
        ObservationLoader {
            cache_dir: cache_dir.to_path_buf(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            download_client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn cache_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }

    /// Returns observations for `key`, honouring `policy`.
    pub async fn retrieve(
        &self,
        key: &CacheKey,
        policy: CachePolicy,
    ) -> Result<StationObservations, ObservationError> {
        let cache_path = self.cache_path(key);
        let cached = fs::metadata(&cache_path).await.is_ok();

        match (policy, cached) {
            (CachePolicy::PreferCache | CachePolicy::CacheOnly, true) => {
                info!("Cache hit for {} at {:?}", key, cache_path);
                Self::read_cache(cache_path).await
            }
            (CachePolicy::CacheOnly, false) => Err(ObservationError::CacheMiss(cache_path)),
            (CachePolicy::PreferCache, false) | (CachePolicy::Refresh, _) => {
                if cached {
                    info!("Refreshing cached observations for {}", key);
                } else {
                    warn!("Cache miss for {}. Downloading.", key);
                }
                let observations = self.fetch(key).await?;
                fs::create_dir_all(&self.cache_dir)
                    .await
                    .map_err(|e| ObservationError::CacheDirCreation(self.cache_dir.clone(), e))?;
                Self::write_cache(&observations, &cache_path).await?;
                Ok(observations)
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ObservationError> {
        let response = self
            .download_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ObservationError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ObservationError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    ObservationError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| ObservationError::NetworkRequest(url.to_string(), e))?;
        serde_json::from_slice(&body).map_err(|e| ObservationError::JsonParse {
            url: url.to_string(),
            source: e,
        })
    }

    /// Exchanges the API key for a short-lived request token.
    async fn fetch_token(&self) -> Result<String, ObservationError> {
        let url = format!("{}/auth", self.base_url);
        debug!("Requesting API token from {}", url);
        let response: TokenResponse = self
            .get_json(&url, &[("apikey", self.api_key.as_str())])
            .await?;
        response.token.ok_or(ObservationError::MissingToken)
    }

    async fn fetch(&self, key: &CacheKey) -> Result<StationObservations, ObservationError> {
        let token = self.fetch_token().await?;
        let url = format!("{}/stations/timeseries", self.base_url);
        let (start, end) = (key.api_start(), key.api_end());
        let vars = REQUESTED_VARIABLES.join(",");
        info!("Downloading observations for {} from {}", key, url);

        let response: TimeseriesResponse = self
            .get_json(
                &url,
                &[
                    ("token", token.as_str()),
                    ("stid", key.station_id.as_str()),
                    ("start", start.as_str()),
                    ("end", end.as_str()),
                    ("vars", vars.as_str()),
                ],
            )
            .await?;
        let observations = response.into_observations(&key.station_id)?;
        info!(
            "Received {} observations for station {}",
            observations.observations.len(),
            observations.station.id
        );
        Ok(observations)
    }

    async fn read_cache(cache_path: PathBuf) -> Result<StationObservations, ObservationError> {
        task::spawn_blocking(move || {
            let bytes = std::fs::read(&cache_path)
                .map_err(|e| ObservationError::CacheRead(cache_path.clone(), e))?;
            let (decoded, _) =
                bincode::serde::decode_from_slice::<StationObservations, _>(&bytes, BINCODE_CONFIG)
                    .map_err(|e| ObservationError::CacheDecode(cache_path, Box::new(e)))?;
            Ok(decoded)
        })
        .await?
    }

    pub(crate) async fn write_cache(
        observations: &StationObservations,
        cache_path: &Path,
    ) -> Result<(), ObservationError> {
        let observations = observations.clone();
        let encoded = task::spawn_blocking(move || {
            bincode::serde::encode_to_vec(&observations, BINCODE_CONFIG)
                .map_err(|e| ObservationError::CacheEncode(Box::new(e)))
        })
        .await??;
        // Only complete files ever appear under the final name.
        let partial_path = partial_cache_path(cache_path);
        fs::write(&partial_path, &encoded)
            .await
            .map_err(|e| ObservationError::CacheWrite(partial_path.clone(), e))?;
        fs::rename(&partial_path, cache_path)
            .await
            .map_err(|e| ObservationError::CacheWrite(cache_path.to_path_buf(), e))?;
        debug!(
            "Wrote {} bytes of observations to {}",
            encoded.len(),
            cache_path.display()
        );
        Ok(())
    }
}
