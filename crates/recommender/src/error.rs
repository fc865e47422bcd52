//! Error types for the recommender crate.

use thiserror::Error;

/// Errors surfaced by the recommender
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// The movie table was empty, so there is nothing to vectorize.
    ///
    /// Raised once at setup; it is the only fatal condition.
    #[error("Cannot build a recommender from an empty movie catalog")]
    EmptyCatalog,

    /// No catalog title contains the normalized query
    #[error("Movie not found: {query}")]
    NotFound { query: String },
}

pub type Result<T> = std::result::Result<T, RecommendError>;
