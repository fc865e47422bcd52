//! ReelRecs HTTP server.
//!
//! Loads the dataset, builds the recommender once, then serves requests
//! against that immutable snapshot.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use data_loader::Dataset;
use recommender::{Recommender, RecommenderConfig, SelfExclusion};
use server::{create_router, AppState};

#[derive(Parser)]
#[command(name = "reel-recs-server")]
#[command(about = "Serve content-based movie recommendations over HTTP", long_about = None)]
struct Args {
    /// Directory holding movies.csv, links.csv and ratings.csv
    #[arg(short, long, env = "REEL_RECS_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Address to listen on
    #[arg(short, long, env = "REEL_RECS_BIND", default_value = "127.0.0.1:5000")]
    bind: String,

    /// Minimum number of ratings a recommended movie needs
    #[arg(long, env = "REEL_RECS_MIN_VOTES", default_value = "5")]
    min_votes: u32,

    /// Exclude the queried movie by identity instead of dropping the top-ranked entry
    #[arg(long, env = "REEL_RECS_EXCLUDE_BY_IDENTITY")]
    exclude_by_identity: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = RecommenderConfig::default()
        .with_min_votes(args.min_votes)
        .with_self_exclusion(if args.exclude_by_identity {
            SelfExclusion::ByIdentity
        } else {
            SelfExclusion::Positional
        });

    // Loading and the similarity matrix are CPU-bound; build off the runtime
    info!("Loading dataset from {}", args.data_dir.display());
    let data_dir = args.data_dir.clone();
    let recommender = tokio::task::spawn_blocking(move || -> Result<Recommender> {
        let dataset = Dataset::load_from_dir(&data_dir).context("Failed to load MovieLens dataset")?;
        Recommender::from_dataset(&dataset, &config).context("Failed to build recommender")
    })
    .await
    .context("Setup task panicked")??;

    let app = create_router(AppState::new(recommender));

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!("Server running on http://{}", args.bind);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
