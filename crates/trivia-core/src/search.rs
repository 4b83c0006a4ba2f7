//! Case-insensitive keyword matching over question text.

use crate::types::Question;

/// True when `term` occurs in `text`, ignoring case.
///
/// A blank term matches nothing. Otherwise the term is matched as given,
/// surrounding whitespace included.
pub fn matches_term(text: &str, term: &str) -> bool {
    if term.trim().is_empty() {
        return false;
    }
    text.to_lowercase().contains(&term.to_lowercase())
}

/// Keep the questions whose `question` text contains `term`.
///
/// Answers and categories are not searched. Order is preserved.
pub fn filter_by_term(questions: Vec<Question>, term: &str) -> Vec<Question> {
    questions
        .into_iter()
        .filter(|q| matches_term(&q.question, term))
        .collect()
}
