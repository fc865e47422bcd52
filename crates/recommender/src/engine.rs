//! # Recommender
//!
//! The immutable context every request runs against. Setup runs once:
//!
//! 1. Aggregate ratings (mean, count, weighted rating per movie)
//! 2. Join movies, links and rating summaries into the catalog
//! 3. Vectorize metadata texts and build the similarity matrix
//!
//! Afterwards nothing mutates, so one `Arc<Recommender>` can serve any
//! number of concurrent requests without locking. Refreshing the data means
//! building a new `Recommender` and swapping the `Arc`.

use crate::catalog::{Catalog, CatalogBuilder, CatalogEntry};
use crate::config::RecommenderConfig;
use crate::error::{RecommendError, Result};
use crate::matcher::TitleMatcher;
use crate::ranker::{Recommendation, RecommendationRanker};
use crate::ratings::RatingAggregator;
use crate::similarity::{SimilarityIndex, SimilarityMatrix};
use data_loader::{Dataset, LinkRecord, MovieRecord, RatingEvent};
use std::time::Instant;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Catalog,
    similarity: SimilarityMatrix,
    matcher: TitleMatcher,
    ranker: RecommendationRanker,
    global_mean: f64,
}

impl Recommender {
    /// Run the whole setup over in-memory tables
    ///
    /// Fails only with [`RecommendError::EmptyCatalog`].
    #[instrument(skip_all, fields(movies = movies.len(), ratings = ratings.len()))]
    pub fn build(
        movies: &[MovieRecord],
        links: &[LinkRecord],
        ratings: &[RatingEvent],
        config: &RecommenderConfig,
    ) -> Result<Self> {
        let start = Instant::now();

        let aggregates = RatingAggregator::new()
            .with_prior_votes(config.prior_votes)
            .aggregate(ratings);

        let catalog = CatalogBuilder::new()
            .with_default_rating(config.default_rating)
            .with_search_url(config.search_url.clone())
            .build(movies, links, &aggregates)?;

        let similarity = SimilarityIndex::new().build(&catalog.metadata_texts())?;

        info!(
            "Recommender ready: {} movies, global mean {:.3}, built in {:.2?}",
            catalog.len(),
            aggregates.global_mean,
            start.elapsed()
        );

        Ok(Self {
            catalog,
            similarity,
            matcher: TitleMatcher::new(),
            ranker: RecommendationRanker::new(config.ranking),
            global_mean: aggregates.global_mean,
        })
    }

    pub fn from_dataset(dataset: &Dataset, config: &RecommenderConfig) -> Result<Self> {
        Self::build(&dataset.movies, &dataset.links, &dataset.ratings, config)
    }

    /// Ranked recommendations for a free-text title
    ///
    /// `Err(NotFound)` when no title matches; `Ok(vec![])` when a title
    /// matched but no candidate qualified.
    pub fn recommend(&self, title: &str) -> Result<Vec<Recommendation>> {
        self.recommend_with_match(title)
            .map(|(_, recommendations)| recommendations)
    }

    /// Like [`Recommender::recommend`], also returning the entry the title matched
    #[instrument(skip(self))]
    pub fn recommend_with_match(
        &self,
        title: &str,
    ) -> Result<(&CatalogEntry, Vec<Recommendation>)> {
        let matched = self
            .matcher
            .find(title, &self.catalog)
            .ok_or_else(|| RecommendError::NotFound {
                query: title.to_string(),
            })?;

        debug!(
            "Matched '{}' to row {} ({})",
            title, matched, self.catalog[matched].title
        );

        Ok((
            &self.catalog[matched],
            self.ranker.rank(matched, &self.catalog, &self.similarity),
        ))
    }

    /// The entry a title resolves to
    pub fn find(&self, title: &str) -> Option<&CatalogEntry> {
        self.matcher
            .find(title, &self.catalog)
            .map(|row| &self.catalog[row])
    }

    /// Every entry a title matches, in catalog order
    pub fn search(&self, title: &str) -> Vec<&CatalogEntry> {
        self.matcher
            .find_all(title, &self.catalog)
            .into_iter()
            .map(|row| &self.catalog[row])
            .collect()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn global_mean(&self) -> f64 {
        self.global_mean
    }
}
