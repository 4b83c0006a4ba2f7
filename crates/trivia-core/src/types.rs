use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// Entities
// =============================================================================

/// A question category, e.g. "Science".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned identifier.
    pub id: i64,
    /// Display label.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A stored trivia question.
///
/// `category` is a soft reference to [`Category::id`]; a value that matches
/// no category is kept as-is and treated as uncategorized by clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// Insert payload for a new question.
///
/// `difficulty` and `category` stay optional so that a request missing them
/// is still handed to the store, which rejects the row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub difficulty: Option<i64>,
    pub category: Option<i64>,
}

/// Category id -> display label, serialized as a JSON object keyed by id.
pub type CategoryMap = BTreeMap<i64, String>;

/// Build the id -> label mapping clients use to label questions.
pub fn category_map(categories: impl IntoIterator<Item = Category>) -> CategoryMap {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}
