//! Per-movie rating aggregation.
//!
//! Turns raw rating events into a mean, a vote count and a smoothed
//! "weighted" rating per movie:
//!
//! ```text
//! WR = v/(v+m) * R + m/(v+m) * C
//! ```
//!
//! with `v` the movie's vote count, `R` its mean, `C` the mean over every
//! event and `m` the prior strength. Few votes pull a movie toward `C`.

use crate::config::DEFAULT_PRIOR_VOTES;
use data_loader::{MovieId, RatingEvent};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Aggregated rating statistics of one movie
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub movie_id: MovieId,
    pub avg_rating: f64,
    pub rating_count: u32,
    pub weighted_rating: f64,
}

/// Output of [`RatingAggregator::aggregate`]
#[derive(Debug, Clone, Default)]
pub struct RatingAggregates {
    /// One entry per movie that has at least one rating
    pub summaries: HashMap<MovieId, RatingSummary>,
    /// Mean over all events, not over per-movie means. 0.0 without events.
    pub global_mean: f64,
}

impl RatingAggregates {
    pub fn get(&self, movie_id: MovieId) -> Option<&RatingSummary> {
        self.summaries.get(&movie_id)
    }
}

/// Computes [`RatingAggregates`] from rating events
#[derive(Debug, Clone, Copy)]
pub struct RatingAggregator {
    prior_votes: f64,
}

impl RatingAggregator {
    pub fn new() -> Self {
        Self {
            prior_votes: DEFAULT_PRIOR_VOTES,
        }
    }

    /// Configure the prior strength `m` (default: 100)
    pub fn with_prior_votes(mut self, prior_votes: f64) -> Self {
        self.prior_votes = prior_votes;
        self
    }

    #[instrument(skip_all, fields(events = events.len()))]
    pub fn aggregate(&self, events: &[RatingEvent]) -> RatingAggregates {
        if events.is_empty() {
            return RatingAggregates::default();
        }

        let total: f64 = events.iter().map(|e| e.rating).sum();
        let global_mean = total / events.len() as f64;

        // Grouping stays sequential so each movie's sum is accumulated in
        // event order and the result doesn't depend on thread scheduling.
        let mut groups: HashMap<MovieId, (f64, u32)> = HashMap::new();
        for event in events {
            let entry = groups.entry(event.movie_id).or_insert((0.0, 0));
            entry.0 += event.rating;
            entry.1 += 1;
        }

        let prior_votes = self.prior_votes;
        let summaries: HashMap<MovieId, RatingSummary> = groups
            .into_par_iter()
            .map(|(movie_id, (sum, count))| {
                let avg_rating = sum / count as f64;
                let summary = RatingSummary {
                    movie_id,
                    avg_rating,
                    rating_count: count,
                    weighted_rating: weighted_rating(avg_rating, count, global_mean, prior_votes),
                };
                (movie_id, summary)
            })
            .collect();

        debug!(
            "Aggregated ratings for {} movies (global mean {:.4})",
            summaries.len(),
            global_mean
        );

        RatingAggregates {
            summaries,
            global_mean,
        }
    }
}

impl Default for RatingAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Bayesian-smoothed rating: a convex blend of `avg_rating` and `global_mean`
pub fn weighted_rating(avg_rating: f64, rating_count: u32, global_mean: f64, prior_votes: f64) -> f64 {
    let v = rating_count as f64;
    let denom = v + prior_votes;
    if denom <= 0.0 {
        return global_mean;
    }
    v / denom * avg_rating + prior_votes / denom * global_mean
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_aggregate_small_example() {
        let events = vec![
            RatingEvent::new(1, 1, 5.0),
            RatingEvent::new(2, 1, 5.0),
            RatingEvent::new(3, 2, 3.0),
        ];

        let aggregates = RatingAggregator::new().aggregate(&events);

        assert!((aggregates.global_mean - 13.0 / 3.0).abs() < EPS);

        let movie = aggregates.get(1).unwrap();
        assert_eq!(movie.rating_count, 2);
        assert!((movie.avg_rating - 5.0).abs() < EPS);
        let expected = 2.0 / 102.0 * 5.0 + 100.0 / 102.0 * (13.0 / 3.0);
        assert!((movie.weighted_rating - expected).abs() < EPS);
        assert!((movie.weighted_rating - 4.3464).abs() < 1e-3);
    }

    #[test]
    fn test_unrated_movie_has_no_summary() {
        let events = vec![RatingEvent::new(1, 1, 4.0)];
        let aggregates = RatingAggregator::new().aggregate(&events);
        assert!(aggregates.get(2).is_none());
    }

    #[test]
    fn test_no_events() {
        let aggregates = RatingAggregator::new().aggregate(&[]);
        assert!(aggregates.summaries.is_empty());
        assert_eq!(aggregates.global_mean, 0.0);
    }

    #[test]
    fn test_weighted_rating_is_bounded_and_monotone() {
        let (avg, mean) = (4.8, 3.5);
        let mut previous = weighted_rating(avg, 0, mean, 100.0);
        assert!((previous - mean).abs() < EPS);

        for count in [1, 5, 50, 100, 1_000, 100_000] {
            let wr = weighted_rating(avg, count, mean, 100.0);
            assert!(wr >= mean && wr <= avg);
            assert!(wr >= previous);
            previous = wr;
        }
        assert!((previous - avg).abs() < 0.01);
    }

    #[test]
    fn test_weighted_rating_below_mean() {
        // A poorly rated movie is pulled up toward the mean, never past it
        let wr = weighted_rating(1.5, 10, 3.5, 100.0);
        assert!(wr > 1.5 && wr < 3.5);
    }

    #[test]
    fn test_prior_votes_builder() {
        let events = vec![RatingEvent::new(1, 1, 5.0), RatingEvent::new(1, 2, 1.0)];
        let aggregates = RatingAggregator::new().with_prior_votes(0.0).aggregate(&events);
        assert!((aggregates.get(1).unwrap().weighted_rating - 5.0).abs() < EPS);
    }
}
