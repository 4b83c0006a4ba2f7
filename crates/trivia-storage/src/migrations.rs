//! Database schema migrations and default data.
//!
//! Applies the initial schema (categories, questions, schema_migrations)
//! and optionally seeds the stock category set.

use rusqlite::Connection;
use tracing::info;

use trivia_core::error::TriviaError;

/// Categories inserted by [`seed_default_categories`], in id order.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

/// Run all pending database migrations.
pub fn run_migrations(conn: &Connection) -> Result<(), TriviaError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| TriviaError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| TriviaError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: categories and questions.
///
/// `questions.category` carries no foreign key: a question may point at a
/// category that does not exist.
fn apply_v1(conn: &Connection) -> Result<(), TriviaError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS categories (
            id      INTEGER PRIMARY KEY AUTOINCREMENT,
            type    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS questions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            question    TEXT NOT NULL,
            answer      TEXT NOT NULL,
            category    INTEGER NOT NULL,
            difficulty  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_questions_category
            ON questions (category, id);

        INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| TriviaError::Storage(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}

/// Insert [`DEFAULT_CATEGORIES`] when the categories table is empty.
///
/// Returns the number of categories inserted.
pub fn seed_default_categories(conn: &Connection) -> Result<usize, TriviaError> {
    let existing: i64 = conn
        .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
        .map_err(|e| TriviaError::Storage(e.to_string()))?;
    if existing > 0 {
        return Ok(0);
    }

    for kind in DEFAULT_CATEGORIES {
        conn.execute(
            "INSERT INTO categories (type) VALUES (?1)",
            rusqlite::params![kind],
        )
        .map_err(|e| TriviaError::Storage(format!("Failed to seed category: {}", e)))?;
    }

    info!(count = DEFAULT_CATEGORIES.len(), "Seeded default categories");
    Ok(DEFAULT_CATEGORIES.len())
}
