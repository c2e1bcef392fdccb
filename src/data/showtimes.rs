//! SerpApi client for Google theater showtime results

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::SourceError;
use crate::config::ApiConfig;

/// Client for theater showtime searches
#[derive(Debug, Clone)]
pub struct ShowtimesClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ShowtimesClient {
    pub fn new(http_client: Client, api: &ApiConfig) -> Self {
        Self {
            http_client,
            base_url: api.serpapi_base_url.clone(),
            api_key: api.serpapi_key.clone(),
        }
    }

    /// Searches showtimes for a theater
    ///
    /// # Arguments
    /// * `theater` - Theater name, e.g. "Ann Arbor 20 IMAX"
    /// * `location` - "City, State, Country"
    pub async fn fetch_theater_showtimes(
        &self,
        theater: &str,
        location: &str,
    ) -> Result<Value, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingApiKey("SerpApi"))?;

        debug!(theater, location, "Requesting theater showtimes");
        let value = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("q", theater),
                ("location", location),
                ("hl", "en"),
                ("gl", "us"),
                ("api_key", api_key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(value)
    }
}
