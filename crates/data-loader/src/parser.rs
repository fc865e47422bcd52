//! Parser for the MovieLens CSV files.
//!
//! - movies.csv: movieId,title,genres
//! - links.csv: movieId,imdbId,tmdbId
//! - ratings.csv: userId,movieId,rating,timestamp
//!
//! Titles may contain commas and are then quoted ("American President, The (1995)"),
//! which is why this goes through the `csv` crate instead of a plain split.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub const MOVIES_FILE: &str = "movies.csv";
pub const LINKS_FILE: &str = "links.csv";
pub const RATINGS_FILE: &str = "ratings.csv";

/// Open a file, reporting a missing file by path rather than as bare I/O
fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn csv_error(file: &str, err: csv::Error) -> DataLoadError {
    DataLoadError::CsvError {
        file: file.to_string(),
        line: err.position().map(|p| p.line()).unwrap_or(0),
        reason: err.to_string(),
    }
}

/// Deserialize every record of a headed CSV stream into `T`
///
/// Columns not named by `T` are ignored, so extra columns (the ratings
/// timestamp) cost nothing.
fn read_records<T, R>(reader: R, file: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    rdr.deserialize::<T>()
        .map(|row| row.map_err(|e| csv_error(file, e)))
        .collect()
}

/// Read `movies.csv` rows from any reader
pub fn read_movies<R: Read>(reader: R) -> Result<Vec<MovieRecord>> {
    read_records(reader, MOVIES_FILE)
}

/// Read `links.csv` rows from any reader
pub fn read_links<R: Read>(reader: R) -> Result<Vec<LinkRecord>> {
    read_records(reader, LINKS_FILE)
}

/// Read `ratings.csv` rows from any reader
pub fn read_ratings<R: Read>(reader: R) -> Result<Vec<RatingEvent>> {
    read_records(reader, RATINGS_FILE)
}

/// Parse the movies.csv file
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRecord>> {
    read_movies(open(path)?)
}

/// Parse the links.csv file
pub fn parse_links(path: &Path) -> Result<Vec<LinkRecord>> {
    read_links(open(path)?)
}

/// Parse the ratings.csv file
pub fn parse_ratings(path: &Path) -> Result<Vec<RatingEvent>> {
    read_ratings(open(path)?)
}
