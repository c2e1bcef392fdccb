//! Interactive numbered menu
//!
//! Reads choices line by line from any `BufRead` and writes to any `Write`,
//! so the whole flow runs the same against stdin/stdout and in tests. Invalid
//! input is re-prompted here and never reaches the service layer. End of
//! input behaves like choosing "Exit".

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::data::{MovieDetail, MovieRecord, TitleLookup};
use crate::index::ShowtimeIndex;
use crate::service::MovieService;

const MAIN_MENU: &[&str] = &[
    "Search Movie Showtime by Theater",
    "List Currently Playing Movies",
    "Search Movie Info by Title",
    "List upcoming movies",
    "Exit",
];

const SHOWTIME_MENU: &[&str] = &[
    "Print detail showtime info",
    "Save tree",
    "Load saved tree",
    "Back to main menu",
];

const PLAYING_MENU: &[&str] = &["Get movie showtime link", "Back to main menu"];

/// Formats one ranked movie with its showtimes grouped by category
pub fn format_ranked(showtime_count: usize, record: &MovieRecord) -> String {
    let mut out = format!(
        "Movie Name: {}\nShowtime ({} available times):\n",
        record.name, showtime_count
    );
    for showing in &record.showing {
        let times: Vec<String> = showing.time.iter().map(|t| t.replace(' ', "")).collect();
        out.push_str(&format!("    {}: {}\n", showing.kind, times.join(" ")));
    }
    out
}

/// Formats an OMDb title result
pub fn format_detail(detail: &MovieDetail) -> String {
    let fields = [
        ("Title", &detail.title),
        ("Released", &detail.released),
        ("Rated", &detail.rated),
        ("Runtime", &detail.runtime),
        ("Director", &detail.director),
        ("Actors", &detail.actors),
        ("Language", &detail.language),
        ("Awards", &detail.awards),
        ("Plot", &detail.plot),
    ];
    fields
        .iter()
        .map(|(label, value)| format!("  {}: {}\n", label, value.as_deref().unwrap_or("N/A")))
        .collect()
}

/// Splits a trailing `(YYYY)` year off a title query
pub fn split_year(query: &str) -> (&str, Option<&str>) {
    let query = query.trim();
    if let Some(head) = query.strip_suffix(')') {
        if let Some((title, year)) = head.rsplit_once('(') {
            let year = year.trim();
            if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) && !title.trim().is_empty() {
                return (title.trim(), Some(year));
            }
        }
    }
    (query, None)
}

/// Text menu driving the movie service
pub struct Menu<'a, R, W> {
    service: &'a MovieService,
    index_path: PathBuf,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a MovieService, index_path: PathBuf, input: R, output: W) -> Self {
        Self {
            service,
            index_path,
            input,
            output,
        }
    }

    /// Consumes the menu and returns its output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the main menu until "Exit" or end of input
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output)?;
            self.print_options(MAIN_MENU)?;
            match self.request_choice(MAIN_MENU.len())? {
                Some(1) => self.search_by_theater().await?,
                Some(2) => self.list_playing().await?,
                Some(3) => self.search_by_title().await?,
                Some(4) => self.list_upcoming().await?,
                _ => break,
            }
        }
        writeln!(self.output, "Thank you for using Movietime!")?;
        Ok(())
    }

    fn print_options(&mut self, options: &[&str]) -> io::Result<()> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, option)?;
        }
        Ok(())
    }

    /// Prompts and reads one trimmed line; `None` at end of input
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("Input closed");
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Reads a number in `1..=max`, re-prompting until one is given
    pub fn request_choice(&mut self, max: usize) -> io::Result<Option<usize>> {
        self.request_in_range(1, max, "Please input a valid number: ")
    }

    fn request_in_range(&mut self, min: usize, max: usize, prompt: &str) -> io::Result<Option<usize>> {
        let mut line = self.read_line(prompt)?;
        while let Some(text) = line {
            match text.parse::<usize>() {
                Ok(n) if (min..=max).contains(&n) => return Ok(Some(n)),
                _ => line = self.read_line("Invalid input, please give a valid option: ")?,
            }
        }
        Ok(None)
    }

    async fn search_by_theater(&mut self) -> io::Result<()> {
        let service = self.service;
        let defaults = service.defaults();
        writeln!(self.output)?;
        writeln!(self.output, "Example:")?;
        writeln!(self.output, "Theater Name: {}", defaults.theater)?;
        writeln!(self.output, "Location: {}", defaults.location)?;
        writeln!(self.output)?;

        let (location, theater) = loop {
            let Some(location) =
                self.read_line("Please specify your location in format [City, State, Country]: ")?
            else {
                return Ok(());
            };
            let Some(theater) = self.read_line("Please specify the theater name: ")? else {
                return Ok(());
            };
            if !location.is_empty() && !theater.is_empty() {
                break (location, theater);
            }
            writeln!(
                self.output,
                "Insufficient information, please specify both location and theater name"
            )?;
        };

        let movies = match self.service.showtimes(&theater, &location).await {
            Ok(movies) => movies,
            Err(e) => {
                writeln!(self.output, "Could not load showtimes: {}", e)?;
                return Ok(());
            }
        };

        let mut index = ShowtimeIndex::from_records(movies);
        writeln!(
            self.output,
            "Movie showtime results have been loaded in a tree, sorted by showtime amount"
        )?;

        loop {
            writeln!(self.output)?;
            self.print_options(SHOWTIME_MENU)?;
            match self.request_choice(SHOWTIME_MENU.len())? {
                Some(1) => self.print_index(&index)?,
                Some(2) => match index.persist(&self.index_path) {
                    Ok(()) => writeln!(self.output, "Save Successful")?,
                    Err(e) => writeln!(self.output, "Save failed: {}", e)?,
                },
                Some(3) => {
                    index = ShowtimeIndex::restore(&self.index_path);
                    writeln!(self.output, "Loaded {} movies from saved tree", index.len())?;
                    self.print_index(&index)?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn print_index(&mut self, index: &ShowtimeIndex) -> io::Result<()> {
        writeln!(self.output)?;
        for (count, record) in index.iter_ranked() {
            writeln!(self.output, "{}", format_ranked(count, record))?;
        }
        Ok(())
    }

    async fn list_playing(&mut self) -> io::Result<()> {
        let movies = match self.service.playing_now().await {
            Ok(movies) => movies,
            Err(e) => {
                writeln!(self.output, "Could not load playing movies: {}", e)?;
                return Ok(());
            }
        };
        if movies.is_empty() {
            writeln!(self.output, "No movies are playing today.")?;
            return Ok(());
        }

        writeln!(self.output)?;
        for (i, movie) in movies.iter().enumerate() {
            writeln!(self.output, "({}) {}", i, movie.name)?;
        }

        loop {
            writeln!(self.output)?;
            self.print_options(PLAYING_MENU)?;
            if self.request_choice(PLAYING_MENU.len())? != Some(1) {
                return Ok(());
            }

            let prompt = format!(
                "Please select a movie number listed above (0-{}): ",
                movies.len() - 1
            );
            let Some(choice) = self.request_in_range(0, movies.len() - 1, &prompt)? else {
                return Ok(());
            };
            let movie = &movies[choice];
            writeln!(self.output, "\nShowtimes for \"{}\": {}\n", movie.name, movie.link)?;
        }
    }

    async fn search_by_title(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        loop {
            let Some(query) = self.read_line(
                "Please input a movie title, optionally with a year like \"Dune (1984)\", \
                 or nothing to go back to the main menu: ",
            )?
            else {
                return Ok(());
            };
            if query.is_empty() {
                return Ok(());
            }

            let (title, year) = split_year(&query);
            match self.service.movie_by_title(title, year).await {
                Ok(TitleLookup::Found(detail)) => {
                    writeln!(self.output)?;
                    writeln!(self.output, "{}", format_detail(&detail))?;
                }
                Ok(TitleLookup::NotFound) => writeln!(self.output, "...Movie Not Found!\n")?,
                Err(e) => writeln!(self.output, "Could not look the title up: {}\n", e)?,
            }
        }
    }

    async fn list_upcoming(&mut self) -> io::Result<()> {
        let movies = match self.service.upcoming().await {
            Ok(movies) => movies,
            Err(e) => {
                writeln!(self.output, "Could not load upcoming movies: {}", e)?;
                return Ok(());
            }
        };
        if movies.is_empty() {
            writeln!(self.output, "No upcoming movies found.")?;
            return Ok(());
        }

        writeln!(
            self.output,
            "\nThere are {} movies in total, how many you want to list",
            movies.len()
        )?;
        let Some(count) = self.request_choice(movies.len())? else {
            return Ok(());
        };
        for movie in movies.iter().take(count) {
            writeln!(self.output, "  Title: {}", movie.name)?;
            writeln!(
                self.output,
                "  Release Date: {}",
                movie.release_date.as_deref().unwrap_or("TBA")
            )?;
            writeln!(self.output)?;
        }
        Ok(())
    }
}
