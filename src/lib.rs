//! Movietime Library
//!
//! Cached lookups of movie showtimes, upcoming releases and title details,
//! plus the showtime ranking index and the interactive menu built on them.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod index;
pub mod logging;
pub mod menu;
pub mod service;
