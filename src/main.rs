//! Movietime - Movie showtime lookup from the terminal
//!
//! Presents a numbered menu for theater showtimes (ranked by number of
//! available times), currently playing movies, title lookups and upcoming
//! releases. API responses are cached on disk between runs.

use std::io;
use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use tracing::{info, warn};

use movietime::cache::JsonCache;
use movietime::cli::{Cli, StartupConfig};
use movietime::logging;
use movietime::menu::Menu;
use movietime::service::MovieService;

fn print_banner() {
    println!("{}", "-".repeat(60));
    println!("Welcome to Movietime!");
    println!("Date for today: {}", Local::now().format("%x"));
    println!("{}", "-".repeat(60));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    logging::init(startup.log_filter());

    let config = startup.config;
    let cache = match config.cache_dir() {
        Some(dir) => JsonCache::with_dir(dir),
        None => {
            warn!("No cache directory available, caching in the working directory");
            JsonCache::with_dir(PathBuf::from("."))
        }
    };
    info!(cache_dir = %cache.dir().display(), "Using cache directory");

    let service = MovieService::new(&config, cache);

    print_banner();
    if startup.preload {
        println!("Loading movie data...");
        service.preload().await;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(&service, config.index_file(), stdin.lock(), stdout.lock());
    menu.run().await?;

    Ok(())
}
