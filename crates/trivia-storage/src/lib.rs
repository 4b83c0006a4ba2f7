//! Trivia storage crate - SQLite persistence for categories and questions.
//!
//! Provides a WAL-mode SQLite database with migrations, default category
//! seeding, and repository implementations for categories and questions.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use migrations::{seed_default_categories, DEFAULT_CATEGORIES};
pub use repository::{CategoryRepository, QuestionRepository};
