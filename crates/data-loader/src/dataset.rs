//! Loading the three tables from a dataset directory.

use crate::error::{DataLoadError, Result};
use crate::parser::{self, LINKS_FILE, MOVIES_FILE, RATINGS_FILE};
use crate::types::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Highest star value a rating can carry
pub const MAX_RATING: f64 = 5.0;

impl Dataset {
    /// Load movies.csv, links.csv and ratings.csv from a directory
    ///
    /// The three files are parsed in parallel; the first parse error wins.
    #[instrument]
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let movies_path = data_dir.join(MOVIES_FILE);
        let links_path = data_dir.join(LINKS_FILE);
        let ratings_path = data_dir.join(RATINGS_FILE);

        // Rayon's `join` runs two closures in parallel; nesting gives three-way parallelism
        let ((movies, links), ratings) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_movies(&movies_path),
                    || parser::parse_links(&links_path),
                )
            },
            || parser::parse_ratings(&ratings_path),
        );

        let dataset = Dataset::new(movies?, links?, ratings?);
        let (movies, links, ratings) = dataset.counts();
        info!("Loaded {} movies, {} links, {} ratings", movies, links, ratings);

        dataset.validate()?;

        let coverage = dataset.coverage();
        debug!(
            "{} movies unrated, {} with an IMDb id, mean rating {:.3}",
            coverage.unrated_movies, coverage.linked_movies, coverage.mean_rating
        );
        Ok(dataset)
    }

    /// How much of the catalog the links and ratings tables describe
    ///
    /// Counts distinct movie ids of `movies`; links and ratings for unknown
    /// movies are ignored, as are links without an IMDb id.
    pub fn coverage(&self) -> Coverage {
        let catalog: HashSet<MovieId> = self.movies.iter().map(|m| m.movie_id).collect();
        let rated: HashSet<MovieId> = self
            .ratings
            .iter()
            .map(|r| r.movie_id)
            .filter(|id| catalog.contains(id))
            .collect();
        let linked: HashSet<MovieId> = self
            .links
            .iter()
            .filter(|l| l.external_link_id.is_some())
            .map(|l| l.movie_id)
            .filter(|id| catalog.contains(id))
            .collect();

        let mean_rating = if self.ratings.is_empty() {
            0.0
        } else {
            self.ratings.iter().map(|r| r.rating).sum::<f64>() / self.ratings.len() as f64
        };

        Coverage {
            catalog_movies: catalog.len(),
            unrated_movies: catalog.len() - rated.len(),
            linked_movies: linked.len(),
            mean_rating,
        }
    }

    /// Validate data integrity
    ///
    /// Checks that the catalog is not empty and that every rating is a
    /// finite value in `0.0..=5.0`. Dangling references (ratings or links
    /// for unknown movies) are allowed: the joins downstream drop them.
    pub fn validate(&self) -> Result<()> {
        if self.movies.is_empty() {
            return Err(DataLoadError::ValidationError(
                "movies table is empty".to_string(),
            ));
        }

        if let Some(bad) = self
            .ratings
            .iter()
            .find(|r| !r.rating.is_finite() || !(0.0..=MAX_RATING).contains(&r.rating))
        {
            return Err(DataLoadError::InvalidValue {
                field: "rating".to_string(),
                value: bad.rating.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_dataset() -> Dataset {
        Dataset::new(
            vec![MovieRecord::new(1, "Toy Story (1995)", Some("Animation"))],
            vec![LinkRecord::new(1, Some("0114709"))],
            vec![RatingEvent::new(1, 1, 4.0), RatingEvent::new(2, 99, 0.5)],
        )
    }

    #[test]
    fn test_validate_accepts_dangling_ratings() {
        assert!(small_dataset().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating() {
        let mut dataset = small_dataset();
        dataset.ratings.push(RatingEvent::new(3, 1, 7.5));

        let err = dataset.validate().unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_catalog() {
        let dataset = Dataset::default();
        assert!(matches!(
            dataset.validate(),
            Err(DataLoadError::ValidationError(_))
        ));
    }

    #[test]
    fn test_coverage() {
        let mut dataset = small_dataset();
        dataset.movies.push(MovieRecord::new(2, "Jumanji (1995)", None));
        dataset.movies.push(MovieRecord::new(3, "Heat (1995)", None));
        dataset.links.push(LinkRecord::new(2, None));
        dataset.links.push(LinkRecord::new(42, Some("0000001")));
        dataset.ratings.push(RatingEvent::new(3, 1, 3.0));

        let coverage = dataset.coverage();
        assert_eq!(coverage.catalog_movies, 3);
        // Only movie 1 is rated; the rating for 99 is dangling
        assert_eq!(coverage.unrated_movies, 2);
        // Movie 2's link has no id and 42 is not in the catalog
        assert_eq!(coverage.linked_movies, 1);
        assert!((coverage.mean_rating - 7.5 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_coverage_without_ratings() {
        let dataset = Dataset::new(vec![MovieRecord::new(1, "Heat (1995)", None)], vec![], vec![]);
        let coverage = dataset.coverage();
        assert_eq!(coverage.unrated_movies, 1);
        assert_eq!(coverage.linked_movies, 0);
        assert_eq!(coverage.mean_rating, 0.0);
    }

    #[test]
    fn test_load_dataset() {
        // This test requires the actual dataset files
        // Place ml-latest-small in ../../data/
        let data_dir = Path::new("../../data");

        if data_dir.join(MOVIES_FILE).exists() {
            let dataset = Dataset::load_from_dir(data_dir).unwrap();
            let (movies, links, _) = dataset.counts();
            assert!(movies > 0);
            assert_eq!(movies, links);
        }
    }
}
