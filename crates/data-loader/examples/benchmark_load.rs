//! Load a MovieLens directory and report how well links and ratings cover it.
//!
//! Usage: cargo run --release --example benchmark_load -- [DATA_DIR]

use data_loader::Dataset;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let start = Instant::now();
    let dataset = Dataset::load_from_dir(&data_dir)?;
    let load_time = start.elapsed();

    let start = Instant::now();
    let coverage = dataset.coverage();
    let coverage_time = start.elapsed();

    let percent = |part: usize| 100.0 * part as f64 / coverage.catalog_movies.max(1) as f64;

    println!("{} loaded in {:.2?}", data_dir.display(), load_time);
    println!(
        "{} ratings ({:.0}/s), mean {:.3}",
        dataset.ratings.len(),
        dataset.ratings.len() as f64 / load_time.as_secs_f64(),
        coverage.mean_rating
    );
    println!(
        "{} movies: {} unrated ({:.1}%), {} with an IMDb id ({:.1}%)",
        coverage.catalog_movies,
        coverage.unrated_movies,
        percent(coverage.unrated_movies),
        coverage.linked_movies,
        percent(coverage.linked_movies)
    );
    println!("Coverage computed in {:.2?}", coverage_time);
    Ok(())
}
