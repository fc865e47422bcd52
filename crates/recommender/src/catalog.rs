//! The movie catalog: movies joined with their links and rating summaries.
//!
//! Row order equals the input movie order and is the index space of the
//! similarity matrix, so nothing here may reorder rows.

use crate::config::{DEFAULT_RATING, DEFAULT_SEARCH_URL};
use crate::error::{RecommendError, Result};
use crate::ratings::RatingAggregates;
use data_loader::{LinkRecord, MovieId, MovieRecord};
use std::collections::HashMap;
use tracing::{debug, instrument};

/// One movie with everything derived from it at setup
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Option<String>,
    pub external_link_id: Option<String>,
    pub avg_rating: f64,
    pub rating_count: u32,
    pub weighted_rating: f64,
    /// Lowercased, trimmed title
    pub normalized_title: String,
    /// Lowercased title with punctuation removed; what queries match against
    pub search_title: String,
    /// "title genres", the text the similarity index vectorizes
    pub metadata_text: String,
    pub display_link: String,
}

/// Ordered, read-only sequence of [`CatalogEntry`]
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&CatalogEntry> {
        self.entries.get(row)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn metadata_texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.metadata_text.as_str()).collect()
    }
}

impl std::ops::Index<usize> for Catalog {
    type Output = CatalogEntry;

    fn index(&self, row: usize) -> &Self::Output {
        &self.entries[row]
    }
}

/// Builds a [`Catalog`] by hash-joining movies with links and rating summaries
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    default_rating: f64,
    search_url: String,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            default_rating: DEFAULT_RATING,
            search_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }

    /// Configure the rating given to unrated movies (default: 3.0)
    pub fn with_default_rating(mut self, default_rating: f64) -> Self {
        self.default_rating = default_rating;
        self
    }

    /// Configure the display link prefix
    pub fn with_search_url(mut self, search_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self
    }

    /// Left-join `movies` with `links` and `ratings`, keeping movie order
    ///
    /// Every movie row yields exactly one entry. When a movie id appears more
    /// than once in `links`, the first link wins.
    #[instrument(skip_all, fields(movies = movies.len(), links = links.len()))]
    pub fn build(
        &self,
        movies: &[MovieRecord],
        links: &[LinkRecord],
        ratings: &RatingAggregates,
    ) -> Result<Catalog> {
        if movies.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }

        let mut link_ids: HashMap<MovieId, Option<&str>> = HashMap::with_capacity(links.len());
        for link in links {
            link_ids
                .entry(link.movie_id)
                .or_insert(link.external_link_id.as_deref());
        }

        let mut unrated = 0usize;
        let entries: Vec<CatalogEntry> = movies
            .iter()
            .map(|movie| {
                let summary = ratings.get(movie.movie_id);
                if summary.is_none() {
                    unrated += 1;
                }

                CatalogEntry {
                    movie_id: movie.movie_id,
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    external_link_id: link_ids
                        .get(&movie.movie_id)
                        .copied()
                        .flatten()
                        .map(str::to_string),
                    avg_rating: summary.map_or(self.default_rating, |s| s.avg_rating),
                    rating_count: summary.map_or(0, |s| s.rating_count),
                    weighted_rating: summary.map_or(self.default_rating, |s| s.weighted_rating),
                    normalized_title: normalize_title(&movie.title),
                    search_title: search_key(&movie.title),
                    metadata_text: metadata_text(&movie.title, movie.genres.as_deref()),
                    display_link: display_link(&self.search_url, &movie.title),
                }
            })
            .collect();

        debug!(
            "Built catalog of {} entries ({} without ratings)",
            entries.len(),
            unrated
        );

        Ok(Catalog::new(entries))
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase and trim
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Lowercase and drop every character that is neither alphanumeric nor whitespace
///
/// Internal whitespace is kept as is. Shared by catalog titles and queries.
pub fn search_key(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

pub fn metadata_text(title: &str, genres: Option<&str>) -> String {
    format!("{} {}", title, genres.unwrap_or(""))
}

/// Search link for a title: spaces become `+`, nothing else is escaped
pub fn display_link(search_url: &str, title: &str) -> String {
    format!("{}{}", search_url, title.replace(' ', "+"))
}
