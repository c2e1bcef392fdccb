//! Daily freshness policy for the showtimes namespace
//!
//! Showtime schedules change every day, so each cached theater response is
//! stamped with the date it was fetched on (`refreshed_on`). An entry whose
//! stamp is not today is fetched again before it is served.

use chrono::{Local, NaiveDate};
use serde_json::Value;
use std::cell::Cell;
use std::fmt::Display;
use std::future::Future;
use tracing::{debug, warn};

use super::{JsonCache, Namespace};
use crate::data::{MovieRecord, ShowtimesResponse};

/// Field holding the refresh date inside a cached showtimes object
pub const STAMP_FIELD: &str = "refreshed_on";

const STAMP_FORMAT: &str = "%Y-%m-%d";

/// Reads the refresh date of a cached showtimes response, if it has a valid one
pub fn stamp_of(value: &Value) -> Option<NaiveDate> {
    let raw = value.get(STAMP_FIELD)?.as_str()?;
    NaiveDate::parse_from_str(raw, STAMP_FORMAT).ok()
}

/// Movies showing today in a showtimes response; empty when the shape is unexpected
fn movies_of(value: Value) -> Vec<MovieRecord> {
    match serde_json::from_value::<ShowtimesResponse>(value) {
        Ok(response) => response.into_today(),
        Err(e) => {
            warn!(error = %e, "Malformed showtimes response, no movies listed");
            Vec::new()
        }
    }
}

/// Showtimes cache that refreshes each theater at most once per calendar day
#[derive(Debug, Clone)]
pub struct ShowtimeCache {
    cache: JsonCache,
}

impl ShowtimeCache {
    pub fn new(cache: JsonCache) -> Self {
        Self { cache }
    }

    /// Today's movies for a theater, using the local calendar date
    pub async fn get_showtimes<F, Fut, E>(
        &self,
        theater_key: &str,
        fetch: F,
    ) -> Result<Vec<MovieRecord>, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: Display,
    {
        self.get_showtimes_on(Local::now().date_naive(), theater_key, fetch)
            .await
    }

    /// Today's movies for a theater, with `today` supplied by the caller
    ///
    /// - never cached: fetched once, stamped `today`
    /// - cached object without a valid stamp: stamped `today`, served as is
    /// - stamped another day, or not an object: fetched again and restamped
    /// - stamped `today`: served from cache
    ///
    /// If the refetch fails, the cached movies are served and the stamp is
    /// left alone so the next call tries again.
    ///
    /// # Arguments
    /// * `today` - Calendar date the stamp is compared against
    /// * `theater_key` - Cache key of the theater (its name)
    /// * `fetch` - Fetches the raw showtimes response; called at most twice
    ///
    /// # Returns
    /// * `Ok(movies)` from the first day of the response, empty when the
    ///   response has no usable `showtimes`
    /// * `Err` only when nothing is cached and the first fetch fails
    pub async fn get_showtimes_on<F, Fut, E>(
        &self,
        today: NaiveDate,
        theater_key: &str,
        mut fetch: F,
    ) -> Result<Vec<MovieRecord>, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
        E: Display,
    {
        let fetched = Cell::new(false);
        let value = self
            .cache
            .fetch_or_get(Namespace::Showtimes, theater_key, || {
                fetched.set(true);
                fetch()
            })
            .await?;

        let stamp = stamp_of(&value);
        match stamp {
            Some(stamp) if stamp == today => return Ok(movies_of(value)),
            None if value.is_object() => {
                return Ok(movies_of(self.store_stamped(theater_key, value, today)))
            }
            // just fetched and still unstampable, leave it for the next call
            None if fetched.get() => return Ok(movies_of(value)),
            _ => {}
        }

        debug!(theater = theater_key, ?stamp, %today, "Showtimes are stale, refetching");
        match fetch().await {
            Ok(fresh) => Ok(movies_of(self.store_stamped(theater_key, fresh, today))),
            Err(e) => {
                warn!(theater = theater_key, error = %e, "Refetch failed, serving stale showtimes");
                Ok(movies_of(value))
            }
        }
    }

    /// Stamps `value` with `today`, stores it under `theater_key` and returns it
    fn store_stamped(&self, theater_key: &str, mut value: Value, today: NaiveDate) -> Value {
        match value.as_object_mut() {
            Some(object) => {
                object.insert(
                    STAMP_FIELD.to_string(),
                    Value::String(today.format(STAMP_FORMAT).to_string()),
                );
            }
            None => warn!(theater = theater_key, "Showtimes response is not an object, cannot stamp"),
        }

        let mut map = self.cache.open(Namespace::Showtimes);
        map.insert(theater_key.to_string(), value.clone());
        self.cache.persist(Namespace::Showtimes, &map);
        value
    }
}
