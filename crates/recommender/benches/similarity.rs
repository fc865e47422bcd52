//! Benchmarks for the recommender setup and request path
//!
//! Run with: cargo bench --package recommender
//!
//! Uses the MovieLens CSVs in ../../data when present, a synthetic catalog otherwise.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Dataset, MovieRecord, RatingEvent};
use recommender::{Recommender, RecommenderConfig, SimilarityIndex};
use std::path::Path;

const GENRES: [&str; 6] = ["Action", "Comedy", "Drama", "Horror", "Romance", "Sci-Fi"];

fn load_test_data() -> Dataset {
    let data_dir = Path::new("../../data");
    if let Ok(dataset) = Dataset::load_from_dir(data_dir) {
        return dataset;
    }

    let movies = (0..2_000u32)
        .map(|id| {
            let genres = format!("{}|{}", GENRES[id as usize % 6], GENRES[(id as usize / 6) % 6]);
            MovieRecord::new(id, format!("Movie {} Part {} ({})", id / 3, id % 3, 1950 + id % 70), Some(genres.as_str()))
        })
        .collect();
    let ratings = (0..50_000u32)
        .map(|i| RatingEvent::new(i % 600, i % 2_000, 0.5 + (i % 10) as f64 * 0.5))
        .collect();
    Dataset::new(movies, Vec::new(), ratings)
}

fn bench_similarity_build(c: &mut Criterion) {
    let dataset = load_test_data();
    let texts: Vec<String> = dataset
        .movies
        .iter()
        .map(|m| format!("{} {}", m.title, m.genres.as_deref().unwrap_or("")))
        .collect();
    let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
    let index = SimilarityIndex::new();

    let mut group = c.benchmark_group("setup");
    group.sample_size(10);
    group.bench_function("similarity_build", |b| {
        b.iter(|| black_box(index.build(black_box(&texts)).unwrap()))
    });
    group.finish();
}

fn bench_recommend(c: &mut Criterion) {
    let dataset = load_test_data();
    let recommender = Recommender::from_dataset(&dataset, &RecommenderConfig::default())
        .expect("Failed to build recommender");
    let title = dataset.movies[dataset.movies.len() / 2].title.clone();

    c.bench_function("recommend", |b| {
        b.iter(|| black_box(recommender.recommend(black_box(&title)).unwrap()))
    });
}

criterion_group!(benches, bench_similarity_build, bench_recommend);
criterion_main!(benches);
