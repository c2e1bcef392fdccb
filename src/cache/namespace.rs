//! Cache namespaces, one JSON file each

use std::fmt;

/// A logical cache domain with its own key space and backing file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Flixster upcoming-releases feed, keyed by request URL
    Upcoming,
    /// Flixster movie details, keyed by movie name
    FlixsterDetail,
    /// OMDb title lookups, keyed by title
    TitleDetail,
    /// Theater showtime searches, keyed by theater name
    Showtimes,
}

impl Namespace {
    #[cfg(test)]
    pub const ALL: [Namespace; 4] = [
        Namespace::Upcoming,
        Namespace::FlixsterDetail,
        Namespace::TitleDetail,
        Namespace::Showtimes,
    ];

    /// File name of the namespace inside the cache directory
    pub fn file_name(self) -> &'static str {
        match self {
            Namespace::Upcoming => "flixster_cache.json",
            Namespace::FlixsterDetail => "flixster_movie_detail_cache.json",
            Namespace::TitleDetail => "movie_detail_cache.json",
            Namespace::Showtimes => "showtimes_cache.json",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Namespace::Upcoming => "upcoming",
            Namespace::FlixsterDetail => "flixster-detail",
            Namespace::TitleDetail => "title-detail",
            Namespace::Showtimes => "showtimes",
        };
        f.write_str(name)
    }
}
