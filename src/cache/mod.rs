//! Cache module for storing API responses to disk
//!
//! Responses are kept per namespace in one JSON file each and reused on every
//! later lookup with the same key. The showtimes namespace adds a daily
//! freshness stamp on top, see [`ShowtimeCache`].

mod freshness;
mod namespace;
mod store;

pub use freshness::{stamp_of, ShowtimeCache, STAMP_FIELD};
pub use namespace::Namespace;
pub use store::{resolve_key, CacheMap, JsonCache};
