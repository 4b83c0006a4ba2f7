//! Trivia server binary - composition root.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize tracing
//! 3. Open the SQLite database (running migrations, seeding categories)
//! 4. Start the axum REST API server

mod cli;

use clap::Parser;

use trivia_api::state::AppState;
use trivia_core::config::TriviaConfig;
use trivia_storage::{seed_default_categories, Database};

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing starts so that its log level can seed
    // the filter; load messages emitted here are not recorded.
    let config_file = args.resolve_config_path();
    let mut config = TriviaConfig::load_or_default(&config_file);
    args.apply(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting trivia v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Storage.
    let db_path = config.database_path();
    let db = match Database::new(&db_path) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(path = %db_path.display(), error = %e, "Failed to open database");
            return Err(e.into());
        }
    };
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    if config.database.seed_categories {
        let inserted = db.with_conn(seed_default_categories)?;
        if inserted > 0 {
            tracing::info!(inserted, "Default categories created");
        }
    }

    // API server.
    let state = AppState::new(config, db);
    if let Err(e) = trivia_api::start_server(state).await {
        tracing::error!(error = %e, "API server stopped");
        return Err(e.into());
    }

    Ok(())
}
