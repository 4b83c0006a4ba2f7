//! Repository implementations for SQLite-backed persistence.
//!
//! Provides CategoryRepository and QuestionRepository that operate on the
//! Database struct using raw SQL.

use std::sync::Arc;

use trivia_core::error::TriviaError;
use trivia_core::quiz::QuizScope;
use trivia_core::types::{Category, NewQuestion, Question};

use crate::db::Database;

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

/// Repository for categories.
pub struct CategoryRepository {
    db: Arc<Database>,
}

impl CategoryRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a new category and return it with its assigned id.
    pub fn insert(&self, kind: &str) -> Result<Category, TriviaError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO categories (type) VALUES (?1)",
                rusqlite::params![kind],
            )
            .map_err(|e| TriviaError::Storage(format!("Failed to save category: {}", e)))?;
            Ok(Category {
                id: conn.last_insert_rowid(),
                kind: kind.to_string(),
            })
        })
    }

    /// Find a category by ID.
    pub fn find_by_id(&self, id: i64) -> Result<Option<Category>, TriviaError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT id, type FROM categories WHERE id = ?1",
                rusqlite::params![id],
                row_to_category,
            )
            .optional()
            .map_err(|e| TriviaError::Storage(e.to_string()))
        })
    }

    /// All categories ordered by id.
    pub fn list_all(&self) -> Result<Vec<Category>, TriviaError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, type FROM categories ORDER BY id")
                .map_err(|e| TriviaError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map([], row_to_category)
                .map_err(|e| TriviaError::Storage(e.to_string()))?;

            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| TriviaError::Storage(e.to_string()))
        })
    }

    /// Count categories.
    pub fn count(&self) -> Result<u64, TriviaError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
                .map_err(|e| TriviaError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

/// Repository for questions.
pub struct QuestionRepository {
    db: Arc<Database>,
}

impl QuestionRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a new question and return it with its assigned id.
    ///
    /// A missing difficulty or category is passed through as NULL and
    /// rejected by the schema.
    pub fn insert(&self, new: &NewQuestion) -> Result<Question, TriviaError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO questions (question, answer, category, difficulty)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![new.question, new.answer, new.category, new.difficulty],
            )
            .map_err(|e| TriviaError::Storage(format!("Failed to save question: {}", e)))?;

            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {} FROM questions WHERE id = ?1", QUESTION_COLUMNS),
                rusqlite::params![id],
                row_to_question,
            )
            .map_err(|e| TriviaError::Storage(e.to_string()))
        })
    }

    /// Find a question by ID.
    pub fn find_by_id(&self, id: i64) -> Result<Option<Question>, TriviaError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {} FROM questions WHERE id = ?1", QUESTION_COLUMNS),
                rusqlite::params![id],
                row_to_question,
            )
            .optional()
            .map_err(|e| TriviaError::Storage(e.to_string()))
        })
    }

    /// All questions ordered by id.
    pub fn list_all(&self) -> Result<Vec<Question>, TriviaError> {
        self.query_questions(
            &format!("SELECT {} FROM questions ORDER BY id", QUESTION_COLUMNS),
            &[],
        )
    }

    /// Questions whose category equals `category_id`, ordered by id.
    pub fn list_by_category(&self, category_id: i64) -> Result<Vec<Question>, TriviaError> {
        self.query_questions(
            &format!(
                "SELECT {} FROM questions WHERE category = ?1 ORDER BY id",
                QUESTION_COLUMNS
            ),
            &[&category_id],
        )
    }

    /// Questions a quiz in `scope` may draw from.
    pub fn list_in_scope(&self, scope: QuizScope) -> Result<Vec<Question>, TriviaError> {
        match scope {
            QuizScope::All => self.list_all(),
            QuizScope::Category(id) => self.list_by_category(id),
        }
    }

    /// Delete a question by ID. Returns false when no row matched.
    pub fn delete(&self, id: i64) -> Result<bool, TriviaError> {
        self.db.with_conn(|conn| {
            let affected = conn
                .execute("DELETE FROM questions WHERE id = ?1", rusqlite::params![id])
                .map_err(|e| TriviaError::Storage(format!("Failed to delete question: {}", e)))?;
            Ok(affected > 0)
        })
    }

    /// Count all questions.
    pub fn count(&self) -> Result<u64, TriviaError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))
                .map_err(|e| TriviaError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }

    fn query_questions(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Question>, TriviaError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(sql)
                .map_err(|e| TriviaError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map(params, row_to_question)
                .map_err(|e| TriviaError::Storage(e.to_string()))?;

            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| TriviaError::Storage(e.to_string()))
        })
    }
}

// ============================================================================
// Helper functions for row-to-entity conversion.
// ============================================================================

fn row_to_category(row: &rusqlite::Row<'_>) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        kind: row.get(1)?,
    })
}

fn row_to_question(row: &rusqlite::Row<'_>) -> Result<Question, rusqlite::Error> {
    Ok(Question {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        category: row.get(3)?,
        difficulty: row.get(4)?,
    })
}

/// Extension trait for rusqlite to support optional query results.
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
