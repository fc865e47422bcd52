//! Row types for the three MovieLens CSV tables.
//!
//! Field names follow the CSV headers through `serde(rename)`, so the
//! parser can hand rows straight to `csv::Reader::deserialize`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Movie-related Types
// =============================================================================

/// One row of `movies.csv` (`movieId,title,genres`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    /// Title as published, usually with the year: "Toy Story (1995)"
    pub title: String,
    /// Pipe-separated genres ("Adventure|Animation|Children")
    ///
    /// Kept as raw text: the recommender feeds it to the text vectorizer
    /// unchanged. `None` when the column is empty.
    #[serde(default)]
    pub genres: Option<String>,
}

impl MovieRecord {
    pub fn new(movie_id: MovieId, title: impl Into<String>, genres: Option<&str>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            genres: genres.map(str::to_string),
        }
    }
}

/// One row of `links.csv` (`movieId,imdbId,tmdbId`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    /// IMDb identifier, kept as text so leading zeros survive
    #[serde(rename = "imdbId", default)]
    pub external_link_id: Option<String>,
    #[serde(rename = "tmdbId", default)]
    pub tmdb_id: Option<u32>,
}

impl LinkRecord {
    pub fn new(movie_id: MovieId, external_link_id: Option<&str>) -> Self {
        Self {
            movie_id,
            external_link_id: external_link_id.map(str::to_string),
            tmdb_id: None,
        }
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// One row of `ratings.csv` (`userId,movieId,rating,timestamp`)
///
/// The timestamp column is present in the file but nothing downstream
/// reads it, so it is not deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingEvent {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(rename = "movieId")]
    pub movie_id: MovieId,
    /// Star rating, 0.5 to 5.0 in half steps
    pub rating: f64,
}

impl RatingEvent {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f64) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
        }
    }
}

// =============================================================================
// Dataset - the three tables held in memory
// =============================================================================

/// All three tables, in file order.
///
/// Row order of `movies` matters downstream: it becomes the index space of
/// the similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub movies: Vec<MovieRecord>,
    pub links: Vec<LinkRecord>,
    pub ratings: Vec<RatingEvent>,
}

impl Dataset {
    pub fn new(movies: Vec<MovieRecord>, links: Vec<LinkRecord>, ratings: Vec<RatingEvent>) -> Self {
        Self {
            movies,
            links,
            ratings,
        }
    }

    /// (movies, links, ratings) row counts
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.movies.len(), self.links.len(), self.ratings.len())
    }
}

/// Result of [`Dataset::coverage`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    /// Distinct movie ids in `movies`
    pub catalog_movies: usize,
    /// Catalog movies with no rating event
    pub unrated_movies: usize,
    /// Catalog movies with at least one IMDb id in `links`
    pub linked_movies: usize,
    /// Mean over every rating event, 0.0 without any
    pub mean_rating: f64,
}
