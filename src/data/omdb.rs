//! Open Movie Database client for title lookups

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::SourceError;
use crate::config::ApiConfig;

/// Client for the OMDb API
#[derive(Debug, Clone)]
pub struct OmdbClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OmdbClient {
    pub fn new(http_client: Client, api: &ApiConfig) -> Self {
        Self {
            http_client,
            base_url: api.omdb_base_url.clone(),
            api_key: api.omdb_api_key.clone(),
        }
    }

    /// Request URL, the cache identity when no explicit key is given
    pub fn url(&self) -> &str {
        &self.base_url
    }

    /// Looks a movie up by title, optionally narrowed to a release year.
    ///
    /// A miss is not an error here: OMDb answers `"Response": "False"`,
    /// which decodes to `TitleLookup::NotFound`.
    pub async fn fetch_by_title(&self, name: &str, year: Option<&str>) -> Result<Value, SourceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SourceError::MissingApiKey("OMDb"))?;

        let mut query = vec![("t", name)];
        if let Some(year) = year {
            query.push(("y", year));
        }
        query.push(("apikey", api_key));

        debug!(title = name, ?year, "Requesting OMDb");
        let value = self
            .http_client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(value)
    }
}
