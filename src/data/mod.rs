//! Data sources and payload models for Movietime
//!
//! This module contains the HTTP clients for the three external movie APIs
//! and the typed payloads decoded from their (cached) JSON responses.

pub mod flixster;
pub mod omdb;
pub mod showtimes;

pub use flixster::FlixsterClient;
pub use omdb::OmdbClient;
pub use showtimes::ShowtimesClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when calling an external data source
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed or returned an error status
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No API key configured for the data source
    #[error("No API key configured for {0}")]
    MissingApiKey(&'static str),
}

/// A single showtime category for a movie (e.g. "Standard", "IMAX")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showing {
    /// Showing category
    #[serde(rename = "type")]
    pub kind: String,
    /// Time-of-day strings for this category
    #[serde(default)]
    pub time: Vec<String>,
}

/// A movie playing at a theater, as returned by the showtimes search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Movie title
    pub name: String,
    /// URL with further showtime detail
    #[serde(default)]
    pub link: String,
    /// Showtimes grouped by category
    #[serde(default)]
    pub showing: Vec<Showing>,
}

impl MovieRecord {
    /// Total number of showtime slots across all showing categories
    pub fn showtime_count(&self) -> usize {
        self.showing.iter().map(|s| s.time.len()).sum()
    }
}

/// One day of showtimes in a theater search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowtimeDay {
    #[serde(default)]
    pub movies: Vec<MovieRecord>,
}

/// Theater showtime search response; only the parts we read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowtimesResponse {
    #[serde(default)]
    pub showtimes: Vec<ShowtimeDay>,
}

impl ShowtimesResponse {
    /// Movies showing today (the first day in the response)
    pub fn into_today(self) -> Vec<MovieRecord> {
        self.showtimes
            .into_iter()
            .next()
            .map(|day| day.movies)
            .unwrap_or_default()
    }
}

/// An upcoming release from the Flixster feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpcomingMovie {
    pub name: String,
    #[serde(rename = "emsVersionId")]
    pub ems_version_id: String,
    #[serde(rename = "releaseDate", default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpcomingData {
    #[serde(default)]
    upcoming: Vec<UpcomingMovie>,
}

/// Flixster upcoming-releases response
#[derive(Debug, Deserialize)]
pub struct UpcomingResponse {
    data: UpcomingData,
}

impl UpcomingResponse {
    pub fn into_movies(self) -> Vec<UpcomingMovie> {
        self.data.upcoming
    }
}

/// Movie details from the Open Movie Database
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MovieDetail {
    pub title: Option<String>,
    pub released: Option<String>,
    pub rated: Option<String>,
    pub runtime: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub language: Option<String>,
    pub awards: Option<String>,
    pub plot: Option<String>,
}

/// Result of a title lookup; a miss is an ordinary outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleLookup {
    Found(MovieDetail),
    NotFound,
}

impl TitleLookup {
    /// Decodes an OMDb response body, mapping `"Response": "False"` to `NotFound`
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        match value.get("Response").and_then(|r| r.as_str()) {
            Some("True") => Ok(TitleLookup::Found(MovieDetail::deserialize(value)?)),
            _ => Ok(TitleLookup::NotFound),
        }
    }
}
