//! Content-based movie recommendations.
//!
//! This crate provides:
//! - RatingAggregator: mean, vote count and weighted rating per movie
//! - CatalogBuilder: movies joined with links and ratings, plus derived search fields
//! - SimilarityIndex: TF-IDF vectors and a dense cosine similarity matrix
//! - TitleMatcher: free-text title lookup
//! - RecommendationRanker: similarity and rating blended into one ranked list
//!
//! ## Example Usage
//! ```ignore
//! use data_loader::Dataset;
//! use recommender::{Recommender, RecommenderConfig};
//!
//! let dataset = Dataset::load_from_dir(Path::new("data"))?;
//! let recommender = Recommender::from_dataset(&dataset, &RecommenderConfig::default())?;
//!
//! for rec in recommender.recommend("toy story")? {
//!     println!("{} ({}%)", rec.movie, rec.similarity);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod ranker;
pub mod ratings;
pub mod similarity;
mod stop_words;

// Re-export main types
pub use catalog::{Catalog, CatalogBuilder, CatalogEntry};
pub use config::{RankingConfig, RecommenderConfig, SelfExclusion};
pub use engine::Recommender;
pub use error::{RecommendError, Result};
pub use matcher::TitleMatcher;
pub use ranker::{Recommendation, RecommendationRanker};
pub use ratings::{RatingAggregates, RatingAggregator, RatingSummary};
pub use similarity::{SimilarityIndex, SimilarityMatrix, TfidfVectorizer};
