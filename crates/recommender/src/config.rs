//! Tunable constants for setup and ranking.
//!
//! `Default` gives the values the ranking formula was tuned with; binaries
//! override individual fields from flags.

use serde::{Deserialize, Serialize};

/// Prior strength `m` of the weighted-rating estimator
pub const DEFAULT_PRIOR_VOTES: f64 = 100.0;

/// Rating given to movies nobody rated
pub const DEFAULT_RATING: f64 = 3.0;

/// Prefix of the display link; the title is appended with spaces as `+`
pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search?q=";

/// How the queried movie itself is kept out of its own recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfExclusion {
    /// Drop whatever ranks first.
    ///
    /// Usually that is the queried movie (self-similarity is 1.0), but not
    /// when it fell under the vote floor or another movie outscores it.
    #[default]
    Positional,
    /// Drop the queried movie's own row, wherever it ranks
    ByIdentity,
}

/// Parameters of the per-request scoring formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Candidates with fewer ratings are skipped
    pub min_votes: u32,
    /// Length of the returned list
    pub max_results: usize,
    /// Vote count at which rating confidence reaches 1.0
    pub rating_saturation: f64,
    /// Share of the score moved from similarity to rating at full confidence
    pub rating_blend: f64,
    /// Average rating from which the quality bonus applies
    pub quality_threshold: f64,
    /// Multiplier applied to well-rated candidates
    pub quality_bonus: f64,
    pub self_exclusion: SelfExclusion,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_votes: 5,
            max_results: 12,
            rating_saturation: 100.0,
            rating_blend: 0.4,
            quality_threshold: 4.0,
            quality_bonus: 1.1,
            self_exclusion: SelfExclusion::Positional,
        }
    }
}

/// Everything `Recommender::build` needs besides the data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub prior_votes: f64,
    pub default_rating: f64,
    pub search_url: String,
    pub ranking: RankingConfig,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            prior_votes: DEFAULT_PRIOR_VOTES,
            default_rating: DEFAULT_RATING,
            search_url: DEFAULT_SEARCH_URL.to_string(),
            ranking: RankingConfig::default(),
        }
    }
}

impl RecommenderConfig {
    /// Configure the minimum-votes floor (default: 5)
    pub fn with_min_votes(mut self, min_votes: u32) -> Self {
        self.ranking.min_votes = min_votes;
        self
    }

    /// Configure how the queried movie is excluded (default: positional)
    pub fn with_self_exclusion(mut self, self_exclusion: SelfExclusion) -> Self {
        self.ranking.self_exclusion = self_exclusion;
        self
    }

    /// Configure the prior strength of the weighted rating (default: 100)
    pub fn with_prior_votes(mut self, prior_votes: f64) -> Self {
        self.prior_votes = prior_votes;
        self
    }
}
