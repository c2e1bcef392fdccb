//! Cached access to the movie data sources
//!
//! `MovieService` decides, for each kind of lookup, which cache namespace and
//! key it lives under, and decodes the cached JSON into typed results.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{resolve_key, JsonCache, Namespace, ShowtimeCache};
use crate::config::{Config, DefaultsConfig};
use crate::data::{
    FlixsterClient, MovieRecord, OmdbClient, ShowtimesClient, SourceError, TitleLookup,
    UpcomingMovie, UpcomingResponse,
};

/// Errors that can occur when looking data up
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The data source could not be reached or refused the request
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The (possibly cached) response did not have the expected shape
    #[error("Unexpected {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of the start-up preload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreloadReport {
    pub upcoming: usize,
    pub details_loaded: usize,
    pub details_failed: usize,
    pub playing: Option<usize>,
}

/// Cached lookups against the three movie data sources
#[derive(Debug, Clone)]
pub struct MovieService {
    cache: JsonCache,
    showtime_cache: ShowtimeCache,
    flixster: FlixsterClient,
    omdb: OmdbClient,
    showtimes: ShowtimesClient,
    defaults: DefaultsConfig,
}

impl MovieService {
    /// Creates a service from configuration, caching under `cache`
    pub fn new(config: &Config, cache: JsonCache) -> Self {
        let http_client = Client::new();
        Self {
            showtime_cache: ShowtimeCache::new(cache.clone()),
            cache,
            flixster: FlixsterClient::new(http_client.clone(), &config.api, &config.defaults),
            omdb: OmdbClient::new(http_client.clone(), &config.api),
            showtimes: ShowtimesClient::new(http_client, &config.api),
            defaults: config.defaults.clone(),
        }
    }

    pub fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }

    /// Upcoming releases, cached under the request URL
    pub async fn upcoming(&self) -> Result<Vec<UpcomingMovie>, ServiceError> {
        let url = self.flixster.upcoming_url();
        let value = self
            .cache
            .fetch_or_get(Namespace::Upcoming, resolve_key(&url, None), || {
                self.flixster.fetch_upcoming()
            })
            .await?;

        serde_json::from_value::<UpcomingResponse>(value)
            .map(UpcomingResponse::into_movies)
            .map_err(|source| ServiceError::Decode {
                what: "upcoming releases",
                source,
            })
    }

    /// Flixster detail document for an upcoming movie, cached by movie name
    pub async fn flixster_detail(
        &self,
        name: &str,
        ems_version_id: &str,
    ) -> Result<Value, ServiceError> {
        let url = self.flixster.detail_url();
        let value = self
            .cache
            .fetch_or_get(Namespace::FlixsterDetail, resolve_key(&url, Some(name)), || {
                self.flixster.fetch_detail(ems_version_id)
            })
            .await?;
        Ok(value)
    }

    /// Title lookup, cached by title (and year when given)
    pub async fn movie_by_title(
        &self,
        name: &str,
        year: Option<&str>,
    ) -> Result<TitleLookup, ServiceError> {
        let key = title_key(name, year);
        let value = self
            .cache
            .fetch_or_get(
                Namespace::TitleDetail,
                resolve_key(self.omdb.url(), Some(key.as_str())),
                || self.omdb.fetch_by_title(name, year),
            )
            .await?;

        TitleLookup::from_json(&value).map_err(|source| ServiceError::Decode {
            what: "title",
            source,
        })
    }

    /// Today's movies at a theater, refreshed at most once a day
    pub async fn showtimes(
        &self,
        theater: &str,
        location: &str,
    ) -> Result<Vec<MovieRecord>, ServiceError> {
        let movies = self
            .showtime_cache
            .get_showtimes(theater, || {
                self.showtimes.fetch_theater_showtimes(theater, location)
            })
            .await?;
        Ok(movies)
    }

    /// Today's movies at the configured default theater
    pub async fn playing_now(&self) -> Result<Vec<MovieRecord>, ServiceError> {
        self.showtimes(&self.defaults.theater, &self.defaults.location)
            .await
    }

    /// Warms the caches: upcoming releases, their details, and the default theater
    ///
    /// Failures are logged and skipped; preload never fails as a whole.
    pub async fn preload(&self) -> PreloadReport {
        let mut report = PreloadReport::default();

        match self.upcoming().await {
            Ok(movies) => {
                report.upcoming = movies.len();
                for movie in &movies {
                    match self.flixster_detail(&movie.name, &movie.ems_version_id).await {
                        Ok(_) => report.details_loaded += 1,
                        Err(e) => {
                            warn!(movie = %movie.name, error = %e, "Failed to preload movie detail");
                            report.details_failed += 1;
                        }
                    }
                }
            }
            Err(e) => warn!(error = %e, "Failed to preload upcoming releases"),
        }

        match self.playing_now().await {
            Ok(movies) => report.playing = Some(movies.len()),
            Err(e) => warn!(theater = %self.defaults.theater, error = %e, "Failed to preload showtimes"),
        }

        info!(?report, "Preload finished");
        report
    }
}

/// Cache key of a title lookup
fn title_key(name: &str, year: Option<&str>) -> String {
    match year {
        Some(year) => format!("{} ({})", name, year),
        None => name.to_string(),
    }
}
