//! # Data Loader Crate
//!
//! This crate reads the MovieLens "latest" CSV dataset into typed, in-memory tables.
//!
//! ## Main Components
//!
//! - **types**: Row types (MovieRecord, LinkRecord, RatingEvent) and the Dataset holder
//! - **parser**: Parse the .csv files into Rust structs
//! - **dataset**: Load a whole directory and validate it
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Dataset;
//! use std::path::Path;
//!
//! let dataset = Dataset::load_from_dir(Path::new("data"))?;
//! let (movies, links, ratings) = dataset.counts();
//! println!("{movies} movies, {links} links, {ratings} ratings");
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod dataset;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Row types
    MovieRecord,
    LinkRecord,
    RatingEvent,
    Dataset,
    Coverage,
};
