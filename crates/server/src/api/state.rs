use std::sync::Arc;

use recommender::Recommender;

/// Shared application state
///
/// The recommender is built once before serving and never mutated, so
/// handlers share it through a plain `Arc` without a lock.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self {
            recommender: Arc::new(recommender),
        }
    }
}
