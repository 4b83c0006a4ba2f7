//! Route handler functions for all API endpoints.
//!
//! Each handler extracts path/query/body input via axum extractors, runs
//! one or two repository calls, and returns a JSON envelope. Store and
//! extractor failures are mapped onto [`ApiError`] kinds per endpoint.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use trivia_core::pagination::{paginate, Page, QUESTIONS_PER_PAGE};
use trivia_core::quiz::{select_question, QuizScope};
use trivia_core::search::filter_by_term;
use trivia_core::types::{category_map, CategoryMap, NewQuestion, Question};
use trivia_storage::{CategoryRepository, QuestionRepository};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

/// `?page=N` query string. Kept as a raw string so that a non-numeric
/// value falls back to the first page instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    pub fn page(&self) -> Page {
        Page::parse(self.page.as_deref())
    }
}

/// Body of `POST /questions`.
///
/// | field        | when absent | rule                                   |
/// |--------------|-------------|----------------------------------------|
/// | `question`   | `""`        | stored as given                        |
/// | `answer`     | `""`        | stored as given                        |
/// | `difficulty` | none        | integer or numeric string; store rejects none |
/// | `category`   | none        | integer or numeric string; store rejects none |
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateQuestionBody {
    pub question: String,
    pub answer: String,
    pub difficulty: Option<Value>,
    pub category: Option<Value>,
}

impl CreateQuestionBody {
    pub fn into_new_question(self) -> NewQuestion {
        NewQuestion {
            question: self.question,
            answer: self.answer,
            difficulty: self.difficulty.as_ref().and_then(int_value),
            category: self.category.as_ref().and_then(int_value),
        }
    }
}

/// Body of `POST /questions/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
}

/// Body of `POST /quizzes`.
#[derive(Debug, Default, Deserialize)]
pub struct QuizBody {
    /// Ids already shown to the player. Non-integer entries are ignored.
    #[serde(default)]
    pub previous_questions: Vec<Value>,
    /// `null` or absent means every category.
    #[serde(default)]
    pub quiz_category: Option<QuizCategoryBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuizCategoryBody {
    /// Category id; `0` means any category.
    pub id: Option<Value>,
}

impl QuizBody {
    pub fn previous_ids(&self) -> HashSet<i64> {
        self.previous_questions.iter().filter_map(int_value).collect()
    }

    /// Resolve the quiz scope. A category object without a usable id is an
    /// error.
    pub fn scope(&self) -> Result<QuizScope, ApiError> {
        match &self.quiz_category {
            None => Ok(QuizScope::All),
            Some(category) => {
                let id = category.id.as_ref().and_then(int_value).ok_or_else(|| {
                    ApiError::unprocessable("quiz_category.id missing or not an integer")
                })?;
                Ok(QuizScope::from_category(Some(id)))
            }
        }
    }
}

/// Accept a JSON integer or a string holding one. Category ids often arrive
/// as strings because clients take them from the keys of the categories
/// object. A float with no fractional part, such as `1.0`, counts as an
/// integer.
fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn page_of(query: Result<Query<PageParams>, QueryRejection>) -> Page {
    query.map(|Query(params)| params.page()).unwrap_or_default()
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: CategoryMap,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: u64,
    pub categories: CategoryMap,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateResponse {
    pub success: bool,
    pub created: i64,
    pub question_created: String,
    pub questions: Vec<Question>,
    pub total_questions: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: u64,
    /// Always null; kept for client compatibility.
    pub current_category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryQuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    /// Count of all stored questions, not just this category's.
    pub total_questions: u64,
    pub current_category: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizResponse {
    pub success: bool,
    /// Null once every question in scope has been played.
    pub question: Option<Question>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub total_questions: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /categories - every category as an id -> label object.
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, ApiError> {
    let repo = CategoryRepository::new(Arc::clone(&state.database));
    let categories = category_map(repo.list_all()?);

    if categories.is_empty() {
        return Err(ApiError::not_found("no categories stored"));
    }

    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}

/// GET /questions?page=N - one page of all questions plus the category map.
pub async fn get_questions(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    let page = page_of(query);
    let questions = QuestionRepository::new(Arc::clone(&state.database)).list_all()?;
    let total_questions = questions.len() as u64;

    let questions = paginate(questions, page, QUESTIONS_PER_PAGE);
    if questions.is_empty() {
        return Err(ApiError::not_found(format!(
            "page {} is empty ({} questions stored)",
            page.number(),
            total_questions
        )));
    }

    let categories = CategoryRepository::new(Arc::clone(&state.database))
        .list_all()
        .map_err(ApiError::unprocessable)?;

    Ok(Json(QuestionsResponse {
        success: true,
        questions,
        total_questions,
        categories: category_map(categories),
    }))
}

/// DELETE /questions/{id}
pub async fn delete_question(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Path(id) = path.map_err(ApiError::not_found)?;
    let repo = QuestionRepository::new(Arc::clone(&state.database));

    if repo.find_by_id(id).map_err(ApiError::unprocessable)?.is_none() {
        return Err(ApiError::not_found(format!("question {} does not exist", id)));
    }

    if !repo.delete(id).map_err(ApiError::unprocessable)? {
        return Err(ApiError::not_found(format!("question {} already deleted", id)));
    }

    tracing::info!(id, "Question deleted");

    Ok(Json(DeleteResponse {
        success: true,
        deleted: id,
    }))
}

/// POST /questions - insert, then return a page of the full list.
pub async fn create_question(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<CreateQuestionBody>, JsonRejection>,
) -> Result<Json<CreateResponse>, ApiError> {
    let Json(body) = body.map_err(ApiError::unprocessable)?;
    let page = page_of(query);
    let repo = QuestionRepository::new(Arc::clone(&state.database));

    let created = repo
        .insert(&body.into_new_question())
        .map_err(ApiError::unprocessable)?;
    tracing::info!(id = created.id, category = created.category, "Question created");

    let questions = repo.list_all().map_err(ApiError::unprocessable)?;
    let total_questions = questions.len() as u64;

    Ok(Json(CreateResponse {
        success: true,
        created: created.id,
        question_created: created.question,
        questions: paginate(questions, page, QUESTIONS_PER_PAGE),
        total_questions,
    }))
}

/// POST /questions/search - case-insensitive match on question text.
pub async fn search_questions(
    State(state): State<AppState>,
    query: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<SearchBody>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(body) = body.map_err(ApiError::not_found)?;
    let term = body.search_term.unwrap_or_default();

    let questions = QuestionRepository::new(Arc::clone(&state.database))
        .list_all()
        .map_err(ApiError::not_found)?;
    let matches = filter_by_term(questions, &term);
    let total_questions = matches.len() as u64;

    tracing::debug!(term = %term, matches = total_questions, "Question search");

    Ok(Json(SearchResponse {
        success: true,
        questions: paginate(matches, page_of(query), QUESTIONS_PER_PAGE),
        total_questions,
        current_category: None,
    }))
}

/// GET /categories/{id}/questions
pub async fn get_category_questions(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<CategoryQuestionsResponse>, ApiError> {
    let Path(id) = path.map_err(ApiError::not_found)?;

    let category = CategoryRepository::new(Arc::clone(&state.database))
        .find_by_id(id)
        .map_err(ApiError::bad_request)?
        .ok_or_else(|| ApiError::not_found(format!("category {} does not exist", id)))?;

    let repo = QuestionRepository::new(Arc::clone(&state.database));
    let questions = repo.list_by_category(id).map_err(ApiError::bad_request)?;
    let total_questions = repo.count().map_err(ApiError::bad_request)?;

    Ok(Json(CategoryQuestionsResponse {
        success: true,
        questions: paginate(questions, page_of(query), QUESTIONS_PER_PAGE),
        total_questions,
        current_category: category.kind,
    }))
}

/// POST /quizzes - a random question not yet played, or null when none remain.
pub async fn play_quiz(
    State(state): State<AppState>,
    body: Result<Json<QuizBody>, JsonRejection>,
) -> Result<Json<QuizResponse>, ApiError> {
    let Json(body) = body.map_err(ApiError::unprocessable)?;
    let scope = body.scope()?;
    let previous = body.previous_ids();

    let pool = QuestionRepository::new(Arc::clone(&state.database))
        .list_in_scope(scope)
        .map_err(ApiError::unprocessable)?;

    let question = select_question(pool, &previous, &mut rand::rng());
    if question.is_none() {
        tracing::debug!(?scope, played = previous.len(), "Quiz pool exhausted");
    }

    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

/// GET /health - liveness plus a question count.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let total_questions = QuestionRepository::new(Arc::clone(&state.database)).count()?;

    Ok(Json(HealthResponse {
        success: true,
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_questions,
    }))
}

/// Fallback for paths with no route.
pub async fn route_not_found() -> ApiError {
    ApiError::not_found("no such route")
}

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

// =============================================================================
// Tests
// =============================================================================
