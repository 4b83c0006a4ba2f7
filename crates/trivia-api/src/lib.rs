//! Trivia API crate - axum HTTP server and route handlers.
//!
//! Provides the REST API the trivia client talks to: category listing,
//! paginated question listing, search, creation, deletion, and quiz play.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
