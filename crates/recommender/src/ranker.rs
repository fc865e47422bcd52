//! Blends content similarity with rating signals into the final list.
//!
//! ## Algorithm
//! For every catalog row `i`, with `sim` = similarity to the matched row:
//! 1. Skip `i` if it has fewer than `min_votes` ratings
//! 2. `rating_weight = min(rating_count / rating_saturation, 1)`
//! 3. `sim_weight = 1 - rating_weight * rating_blend`
//! 4. `score = sim_weight * 5 * sim + rating_weight * rating_blend * weighted_rating`
//! 5. Multiply by `quality_bonus` when `avg_rating >= quality_threshold`
//!
//! Survivors are stable-sorted by descending score (ties keep catalog
//! order), the queried movie is excluded and the next `max_results` emitted.

use crate::catalog::{Catalog, CatalogEntry};
use crate::config::{RankingConfig, SelfExclusion};
use crate::similarity::SimilarityMatrix;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Similarity is rescaled from [0, 1] to the 0-5 star range
const SIMILARITY_SCALE: f64 = 5.0;

/// One emitted recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub movie: String,
    pub link: String,
    /// Average rating, one decimal
    pub rating: f64,
    pub rating_count: u32,
    /// Similarity to the queried movie in percent, 0-100
    pub similarity: u32,
}

/// A catalog row that survived the vote floor, with its score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub row: usize,
    pub combined_score: f64,
    pub similarity: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationRanker {
    config: RankingConfig,
}

impl RecommendationRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    /// Score of one candidate given its similarity to the queried movie
    pub fn combined_score(&self, similarity: f64, entry: &CatalogEntry) -> f64 {
        let normalized_sim = similarity * SIMILARITY_SCALE;
        let rating_weight =
            (entry.rating_count as f64 / self.config.rating_saturation).min(1.0);
        let sim_weight = 1.0 - rating_weight * self.config.rating_blend;

        let score = sim_weight * normalized_sim
            + rating_weight * self.config.rating_blend * entry.weighted_rating;

        if entry.avg_rating >= self.config.quality_threshold {
            score * self.config.quality_bonus
        } else {
            score
        }
    }

    /// Every row above the vote floor, sorted by descending score
    ///
    /// The sort is stable: equal scores stay in catalog order.
    pub fn score_candidates(
        &self,
        matched: usize,
        catalog: &Catalog,
        similarity: &SimilarityMatrix,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = similarity
            .row(matched)
            .iter()
            .zip(catalog.iter())
            .enumerate()
            .filter(|(_, (_, entry))| entry.rating_count >= self.config.min_votes)
            .map(|(row, (&sim, entry))| ScoredCandidate {
                row,
                combined_score: self.combined_score(sim, entry),
                similarity: sim,
            })
            .collect();

        scored.sort_by(|a, b| {
            b.combined_score
                .partial_cmp(&a.combined_score)
                .unwrap_or(Ordering::Equal)
        });
        scored
    }

    /// Ranked recommendations for the movie at row `matched`
    pub fn rank(
        &self,
        matched: usize,
        catalog: &Catalog,
        similarity: &SimilarityMatrix,
    ) -> Vec<Recommendation> {
        let scored = self.score_candidates(matched, catalog, similarity);
        let survivors = scored.len();

        let kept: Vec<ScoredCandidate> = match self.config.self_exclusion {
            // Drops rank 0 even when it is not the queried movie
            SelfExclusion::Positional => scored
                .into_iter()
                .skip(1)
                .take(self.config.max_results)
                .collect(),
            SelfExclusion::ByIdentity => scored
                .into_iter()
                .filter(|c| c.row != matched)
                .take(self.config.max_results)
                .collect(),
        };

        debug!(
            "Ranked {} candidates above the vote floor, emitting {}",
            survivors,
            kept.len()
        );

        kept.iter()
            .map(|candidate| {
                let entry = &catalog[candidate.row];
                Recommendation {
                    movie: entry.title.clone(),
                    link: entry.display_link.clone(),
                    rating: round_to_tenth(entry.avg_rating),
                    rating_count: entry.rating_count,
                    similarity: (candidate.similarity * 100.0).round_ties_even() as u32,
                }
            })
            .collect()
    }
}

/// One decimal, rounded from the exact stored value
///
/// 2.45 is stored as 2.4500000000000002 and becomes 2.5; only exact
/// binary ties such as 2.25 go to even.
fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::ratings::RatingAggregator;
    use crate::similarity::SimilarityIndex;
    use data_loader::{MovieRecord, RatingEvent};

    fn entry(avg_rating: f64, rating_count: u32, weighted_rating: f64) -> CatalogEntry {
        CatalogEntry {
            movie_id: 1,
            title: "Test (2000)".to_string(),
            genres: None,
            external_link_id: None,
            avg_rating,
            rating_count,
            weighted_rating,
            normalized_title: "test (2000)".to_string(),
            search_title: "test 2000".to_string(),
            metadata_text: "Test (2000) ".to_string(),
            display_link: "https://www.google.com/search?q=Test+(2000)".to_string(),
        }
    }

    /// Movies 1-3 are a franchise, 4-5 unrelated; `votes` gives (count, rating) per movie
    fn fixture(votes: &[(u32, f64)]) -> (Catalog, SimilarityMatrix) {
        let movies = vec![
            MovieRecord::new(1, "Space Saga (1977)", Some("Action|Adventure|Sci-Fi")),
            MovieRecord::new(2, "Space Saga Returns (1980)", Some("Action|Adventure|Sci-Fi")),
            MovieRecord::new(3, "Space Saga Forever (1983)", Some("Action|Adventure|Sci-Fi")),
            MovieRecord::new(4, "Quiet Garden (1990)", Some("Drama")),
            MovieRecord::new(5, "Laughing Matters (1991)", Some("Comedy")),
        ];
        let mut events = Vec::new();
        for (i, &(count, rating)) in votes.iter().enumerate() {
            for user in 0..count {
                events.push(RatingEvent::new(user, i as u32 + 1, rating));
            }
        }
        let ratings = RatingAggregator::new().aggregate(&events);
        let catalog = CatalogBuilder::new().build(&movies, &[], &ratings).unwrap();
        let matrix = SimilarityIndex::new().build(&catalog.metadata_texts()).unwrap();
        (catalog, matrix)
    }

    #[test]
    fn test_combined_score_formula() {
        let ranker = RecommendationRanker::default();

        // No votes: pure similarity on the 0-5 scale
        assert!((ranker.combined_score(0.5, &entry(3.0, 0, 3.0)) - 2.5).abs() < 1e-12);

        // 50 votes: rating weight 0.5, similarity weight 0.8
        let expected = 0.8 * 2.5 + 0.5 * 0.4 * 3.5;
        assert!((ranker.combined_score(0.5, &entry(3.5, 50, 3.5)) - expected).abs() < 1e-12);

        // Rating weight saturates at 100 votes, bonus above 4.0
        let expected = (0.6 * 2.5 + 0.4 * 4.2) * 1.1;
        assert!((ranker.combined_score(0.5, &entry(4.5, 1_000, 4.2)) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_quality_bonus_never_ranks_lower() {
        let ranker = RecommendationRanker::default();
        for sim in [0.0, 0.2, 0.5, 0.9] {
            let plain = ranker.combined_score(sim, &entry(3.9, 50, 3.9));
            let bonus = ranker.combined_score(sim, &entry(4.0, 50, 3.9));
            assert!(bonus >= plain);
        }
    }

    #[test]
    fn test_more_votes_help_when_rating_outweighs_similarity() {
        let ranker = RecommendationRanker::default();
        for sim in [0.0, 0.2, 0.5, 0.8] {
            let few = ranker.combined_score(sim, &entry(4.2, 10, 4.1));
            let many = ranker.combined_score(sim, &entry(4.2, 200, 4.1));
            assert!(many >= few);
        }
    }

    #[test]
    fn test_vote_floor_and_positional_drop() {
        let (catalog, matrix) = fixture(&[(50, 4.0), (50, 4.0), (4, 5.0), (20, 3.0), (20, 3.0)]);
        let ranker = RecommendationRanker::default();

        let scored = ranker.score_candidates(0, &catalog, &matrix);
        assert!(scored.iter().all(|c| catalog[c.row].rating_count >= 5));
        assert_eq!(scored[0].row, 0);

        let recs = ranker.rank(0, &catalog, &matrix);
        let titles: Vec<&str> = recs.iter().map(|r| r.movie.as_str()).collect();
        assert_eq!(titles[0], "Space Saga Returns (1980)");
        assert!(!titles.contains(&"Space Saga (1977)"));
        assert!(!titles.contains(&"Space Saga Forever (1983)"));
        assert_eq!(recs.len(), 3);

        assert_eq!(recs[0].rating, 4.0);
        assert_eq!(recs[0].rating_count, 50);
        assert!(recs[0].similarity > 0 && recs[0].similarity <= 100);
    }

    #[test]
    fn test_positional_drop_when_query_below_floor() {
        // The queried movie has too few votes, so rank 0 is another movie
        let (catalog, matrix) = fixture(&[(2, 4.0), (50, 4.0), (50, 4.0), (20, 3.0), (20, 3.0)]);

        let positional = RecommendationRanker::default().rank(0, &catalog, &matrix);
        assert_eq!(positional.len(), 3);

        let config = RankingConfig {
            self_exclusion: SelfExclusion::ByIdentity,
            ..RankingConfig::default()
        };
        let by_identity = RecommendationRanker::new(config).rank(0, &catalog, &matrix);
        assert_eq!(by_identity.len(), 4);
        assert!(by_identity[0].movie.starts_with("Space Saga"));

        // Positional exclusion threw away a legitimate recommendation
        assert_eq!(positional, by_identity[1..].to_vec());
    }

    #[test]
    fn test_result_length_is_capped() {
        let config = RankingConfig {
            max_results: 2,
            ..RankingConfig::default()
        };
        let (catalog, matrix) = fixture(&[(10, 3.0); 5]);
        let recs = RecommendationRanker::new(config).rank(0, &catalog, &matrix);
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn test_default_config_returns_twelve() {
        // Twenty well-voted movies in the same genre: 19 candidates besides the query
        let movies: Vec<MovieRecord> = (1..=20)
            .map(|id| MovieRecord::new(id, format!("Harbor Story {id} (2001)"), Some("Drama|Romance")))
            .collect();
        let events: Vec<RatingEvent> = (1..=20)
            .flat_map(|movie| (0..6).map(move |user| RatingEvent::new(user, movie, 3.5)))
            .collect();
        let ratings = RatingAggregator::new().aggregate(&events);
        let catalog = CatalogBuilder::new().build(&movies, &[], &ratings).unwrap();
        let matrix = SimilarityIndex::new().build(&catalog.metadata_texts()).unwrap();

        let ranker = RecommendationRanker::default();
        assert_eq!(ranker.score_candidates(0, &catalog, &matrix).len(), 20);

        let recs = ranker.rank(0, &catalog, &matrix);
        assert_eq!(recs.len(), 12);
        assert!(recs.iter().all(|r| r.movie != "Harbor Story 1 (2001)"));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        // Movies 4 and 5 share nothing with the query and have identical stats
        let (catalog, matrix) = fixture(&[(10, 3.0); 5]);
        let scored = RecommendationRanker::default().score_candidates(0, &catalog, &matrix);
        let tail: Vec<usize> = scored.iter().rev().take(2).map(|c| c.row).collect();
        assert_eq!(tail, vec![4, 3]);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to_tenth(3.94), 3.9);
        assert_eq!(round_to_tenth(4.0), 4.0);
        assert_eq!(round_to_tenth(2.25), 2.2);

        // Stored just above the tie, so they round up
        assert_eq!(round_to_tenth(2.45), 2.5);
        assert_eq!(round_to_tenth(3.85), 3.9);
        assert_eq!(round_to_tenth(24.5 / 10.0), 2.5);
        assert_eq!(round_to_tenth(77.0 / 20.0), 3.9);
    }

    #[test]
    fn test_record_rating_is_rounded_from_stored_mean() {
        let movies = vec![
            MovieRecord::new(1, "Space Saga (1977)", Some("Action|Sci-Fi")),
            MovieRecord::new(2, "Space Saga Returns (1980)", Some("Action|Sci-Fi")),
        ];
        // 24.5 stars over 10 votes
        let events: Vec<RatingEvent> = (0..10)
            .map(|user| RatingEvent::new(user, 2, if user == 0 { 2.0 } else { 2.5 }))
            .collect();
        let ratings = RatingAggregator::new().aggregate(&events);
        let catalog = CatalogBuilder::new().build(&movies, &[], &ratings).unwrap();
        let matrix = SimilarityIndex::new().build(&catalog.metadata_texts()).unwrap();
        assert_eq!(catalog[1].avg_rating, 2.45);

        let config = RankingConfig {
            self_exclusion: SelfExclusion::ByIdentity,
            ..RankingConfig::default()
        };
        let recs = RecommendationRanker::new(config).rank(0, &catalog, &matrix);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].rating, 2.5);
    }
}
