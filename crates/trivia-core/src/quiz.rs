//! Next-question selection for quiz play.

use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::types::Question;

/// Category id clients send to mean "any category".
pub const ANY_CATEGORY: i64 = 0;

/// Which questions a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizScope {
    All,
    Category(i64),
}

impl QuizScope {
    /// Scope for an optional quiz category id. No category and
    /// [`ANY_CATEGORY`] both select every question.
    pub fn from_category(category_id: Option<i64>) -> Self {
        match category_id {
            None | Some(ANY_CATEGORY) => QuizScope::All,
            Some(id) => QuizScope::Category(id),
        }
    }
}

/// Drop questions the player has already seen.
pub fn remaining(pool: Vec<Question>, previous_ids: &HashSet<i64>) -> Vec<Question> {
    pool.into_iter()
        .filter(|q| !previous_ids.contains(&q.id))
        .collect()
}

/// Pick one unseen question uniformly at random.
///
/// Returns `None` once every question in the pool has been seen.
pub fn select_question<R: Rng + ?Sized>(
    pool: Vec<Question>,
    previous_ids: &HashSet<i64>,
    rng: &mut R,
) -> Option<Question> {
    remaining(pool, previous_ids).choose(rng).cloned()
}
