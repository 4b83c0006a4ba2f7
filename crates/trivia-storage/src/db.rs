//! SQLite handle for the trivia store.
//!
//! One connection holds both the categories and questions tables. It opens in
//! WAL mode and runs pending migrations before the first request.
//!
//! `foreign_keys` stays off. `questions.category` is a plain integer with no
//! constraint, so a question may name a category id that has no row; the
//! by-category listing and quiz scope simply filter on the value.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::info;

use trivia_core::error::TriviaError;

use crate::migrations;

/// Shared trivia store, passed to handlers through the app state.
///
/// rusqlite's `Connection` is not `Sync`, so it sits behind a Mutex. Each
/// closure passed to [`Database::with_conn`] is one unit of work: a listing,
/// an insert, or a delete runs to completion before the next request's.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a database at the given path.
    ///
    /// Configures WAL mode and synchronous=NORMAL, then runs all pending
    /// migrations.
    pub fn new(path: &Path) -> Result<Self, TriviaError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| TriviaError::Storage(format!("Failed to open database: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| TriviaError::Storage(format!("Failed to set pragmas: {}", e)))?;

        info!("Database opened at {}", path.display());

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, TriviaError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TriviaError::Storage(format!("Failed to open in-memory db: {}", e)))?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.with_conn(migrations::run_migrations)?;

        Ok(db)
    }

    /// Execute a closure with a reference to the underlying connection.
    ///
    /// The mutex is held for the duration of the closure.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, TriviaError>
    where
        F: FnOnce(&Connection) -> Result<T, TriviaError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| TriviaError::Storage(format!("Database lock poisoned: {}", e)))?;
        f(&conn)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish()
    }
}
