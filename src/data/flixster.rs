//! Flixster (RapidAPI) client for upcoming releases and movie details

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::SourceError;
use crate::config::{ApiConfig, DefaultsConfig};

/// Client for the Flixster API hosted on RapidAPI
#[derive(Debug, Clone)]
pub struct FlixsterClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
    api_host: String,
    country_id: String,
    upcoming_limit: u32,
}

impl FlixsterClient {
    pub fn new(http_client: Client, api: &ApiConfig, defaults: &DefaultsConfig) -> Self {
        Self {
            http_client,
            base_url: api.flixster_base_url.trim_end_matches('/').to_string(),
            api_key: api.rapidapi_key.clone(),
            api_host: api.rapidapi_host.clone(),
            country_id: defaults.country_id.clone(),
            upcoming_limit: defaults.upcoming_limit,
        }
    }

    /// URL of the upcoming-releases endpoint, also its cache identity
    pub fn upcoming_url(&self) -> String {
        format!("{}/get-upcoming", self.base_url)
    }

    /// URL of the movie detail endpoint
    pub fn detail_url(&self) -> String {
        format!("{}/detail", self.base_url)
    }

    /// Fetches the upcoming-releases feed as raw JSON
    pub async fn fetch_upcoming(&self) -> Result<Value, SourceError> {
        let limit = self.upcoming_limit.to_string();
        self.get(
            &self.upcoming_url(),
            &[("countryId", self.country_id.as_str()), ("limit", limit.as_str())],
        )
        .await
    }

    /// Fetches the detail document for one movie as raw JSON
    pub async fn fetch_detail(&self, ems_version_id: &str) -> Result<Value, SourceError> {
        self.get(&self.detail_url(), &[("emsVersionId", ems_version_id)])
            .await
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingApiKey("Flixster (RapidAPI)"))?;

        debug!(url, "Requesting Flixster");
        let value = self
            .http_client
            .get(url)
            .header("X-RapidAPI-Key", api_key)
            .header("X-RapidAPI-Host", &self.api_host)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(value)
    }
}
