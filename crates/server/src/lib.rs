//! HTTP front end for the ReelRecs recommender.
//!
//! - `POST /recommend` `{"movie": "..."}` → `{"recommendations": [...]}`,
//!   400 when no title is given, 404 when no movie matches
//! - `GET /health` → status and catalog size

pub mod api;

pub use api::{create_router, AppError, AppState};
