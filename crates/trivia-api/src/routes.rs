//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with CORS, tracing, compression, JSON
//! fallbacks, and all endpoint handlers.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use trivia_core::error::TriviaError;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// # Arguments
/// * `state` - The shared application state.
///
/// # Returns
/// A fully configured axum Router ready to serve requests.
pub fn create_router(state: AppState) -> Router {
    // Any origin may call the API; credentials are never used.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/categories", get(handlers::get_categories))
        .route(
            "/categories/{id}/questions",
            get(handlers::get_category_questions),
        )
        .route(
            "/questions",
            get(handlers::get_questions).post(handlers::create_question),
        )
        .route("/questions/search", post(handlers::search_questions))
        .route("/questions/{id}", delete(handlers::delete_question))
        .route("/quizzes", post(handlers::play_quiz))
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1MB global limit
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
pub async fn start_server(state: AppState) -> Result<(), TriviaError> {
    let addr = state.config.bind_addr();
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TriviaError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router)
        .await
        .map_err(|e| TriviaError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
