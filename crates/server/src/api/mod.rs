pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{AppError, AppResult};
pub use routes::create_router;
pub use state::AppState;
