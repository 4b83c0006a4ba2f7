//! Application state shared across all route handlers.
//!
//! AppState holds the database handle and configuration. It is passed to
//! handlers via axum's State extractor.

use std::sync::Arc;
use std::time::Instant;

use trivia_core::config::TriviaConfig;
use trivia_storage::Database;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<TriviaConfig>,
    /// SQLite database for persistent storage.
    pub database: Arc<Database>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState with the given components.
    pub fn new(config: TriviaConfig, database: Database) -> Self {
        Self {
            config: Arc::new(config),
            database: Arc::new(database),
            start_time: Instant::now(),
        }
    }
}
