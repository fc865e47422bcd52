use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::Dataset;
use recommender::{Recommendation, Recommender, RecommenderConfig, RecommendError, SelfExclusion};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// ReelRecs - Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Content-based movie recommendations from a title", long_about = None)]
struct Cli {
    /// Directory holding movies.csv, links.csv and ratings.csv
    #[arg(short, long, env = "REEL_RECS_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Minimum number of ratings a recommended movie needs
    #[arg(long, default_value = "5")]
    min_votes: u32,

    /// Exclude the queried movie by identity instead of dropping the top-ranked entry
    #[arg(long)]
    exclude_by_identity: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movies similar to a title
    Recommend {
        /// Free-text movie title
        #[arg(long)]
        title: String,
    },

    /// List every movie a title matches, in catalog order
    Search {
        /// Free-text movie title
        #[arg(long)]
        title: String,

        /// Maximum number of results to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = RecommenderConfig::default()
        .with_min_votes(cli.min_votes)
        .with_self_exclusion(if cli.exclude_by_identity {
            SelfExclusion::ByIdentity
        } else {
            SelfExclusion::Positional
        });

    // Load data and build the recommender (this may take a moment)
    println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let dataset = Dataset::load_from_dir(&cli.data_dir)
        .context("Failed to load MovieLens dataset")?;
    let recommender = Arc::new(
        Recommender::from_dataset(&dataset, &config).context("Failed to build recommender")?,
    );
    println!(
        "{} Built recommender over {} movies in {:?}",
        "✓".green(),
        recommender.catalog().len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend { title } => handle_recommend(&recommender, &title)?,
        Commands::Search { title, limit } => handle_search(&recommender, &title, limit),
        Commands::Benchmark { requests } => handle_benchmark(recommender, requests).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(recommender: &Recommender, title: &str) -> Result<()> {
    let (matched, recommendations) = match recommender.recommend_with_match(title) {
        Ok(found) => found,
        Err(RecommendError::NotFound { query }) => {
            return Err(anyhow!("No movie matches '{}'", query));
        }
        Err(e) => return Err(e.into()),
    };
    println!(
        "{} {} (avg {:.2}, {} ratings)",
        "Matched:".bold(),
        matched.title,
        matched.avg_rating,
        matched.rating_count
    );

    print_recommendations(&recommendations);
    Ok(())
}

/// Handle the 'search' command
fn handle_search(recommender: &Recommender, title: &str, limit: usize) {
    let matches = recommender.search(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
        return;
    }
    for entry in matches.iter().take(limit) {
        println!(
            "{}: {} [{}] avg {:.2} ({} ratings)",
            entry.movie_id,
            entry.title,
            entry.genres.as_deref().unwrap_or("-"),
            entry.avg_rating,
            entry.rating_count
        );
    }
    if matches.len() > limit {
        println!("  ... and {} more", matches.len() - limit);
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(recommender: Arc<Recommender>, requests: usize) -> Result<()> {
    if requests == 0 {
        return Err(anyhow!("--requests must be at least 1"));
    }

    // Sample titles straight from the catalog so every request matches
    let catalog_size = recommender.catalog().len();
    let titles: Vec<String> = (0..requests)
        .map(|_| recommender.catalog()[rand::random_range(0..catalog_size)].title.clone())
        .collect();

    let wall_clock = Instant::now();
    let mut handles = vec![];
    for title in titles {
        let recommender = recommender.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            recommender.recommend(&title)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        });
        handles.push(handle);
    }

    // Wait for all tasks to complete and collect timings
    let mut timings = vec![];
    for handle in handles {
        let elapsed = handle.await??;
        timings.push(elapsed);
    }
    let wall_clock = wall_clock.elapsed();
    info!("Completed {} benchmark requests", timings.len());

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f64 / wall_clock.as_secs_f64();

    println!("Benchmark results:");
    println!("Wall-clock time: {:?}", wall_clock);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[Recommendation]) {
    print!("{}", "Movie Recommendations:\n".bold().blue());
    if recommendations.is_empty() {
        println!("  (no movie has enough ratings to recommend)");
        return;
    }
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} - rating {:.1} ({} ratings), {}% similar",
            (rank + 1).to_string().green(),
            rec.movie,
            rec.rating,
            rec.rating_count,
            rec.similarity
        );
        println!("   {}", rec.link.dimmed());
    }
}
