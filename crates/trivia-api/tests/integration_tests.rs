//! Integration tests for the trivia API.
//!
//! Covers every route's happy path and its error mapping. Each test builds
//! its own in-memory database.

use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use trivia_api::create_router;
use trivia_api::handlers::{
    CategoriesResponse, CategoryQuestionsResponse, CreateResponse, DeleteResponse,
    QuestionsResponse, QuizResponse, SearchResponse,
};
use trivia_api::state::AppState;
use trivia_core::config::TriviaConfig;
use trivia_core::error::TriviaError;
use trivia_core::types::{NewQuestion, Question};
use trivia_storage::{seed_default_categories, Database, QuestionRepository};

// =============================================================================
// Helpers
// =============================================================================

/// Fresh state with an empty in-memory database.
fn make_state() -> AppState {
    AppState::new(TriviaConfig::default(), Database::in_memory().unwrap())
}

/// Fresh state with the six default categories.
fn seeded_state() -> AppState {
    let state = make_state();
    state.database.with_conn(seed_default_categories).unwrap();
    state
}

fn add_question(state: &AppState, text: &str, answer: &str, category: i64) -> Question {
    QuestionRepository::new(Arc::clone(&state.database))
        .insert(&NewQuestion {
            question: text.to_string(),
            answer: answer.to_string(),
            difficulty: Some(2),
            category: Some(category),
        })
        .unwrap()
}

/// Insert `n` questions numbered from 1, alternating categories 1 and 2.
fn add_numbered(state: &AppState, n: usize) {
    for i in 1..=n {
        add_question(
            state,
            &format!("Question number {}", i),
            &format!("Answer {}", i),
            if i % 2 == 0 { 2 } else { 1 },
        );
    }
}

fn drop_questions_table(state: &AppState) {
    state
        .database
        .with_conn(|conn| {
            conn.execute_batch("DROP TABLE questions")
                .map_err(|e| TriviaError::Storage(e.to_string()))
        })
        .unwrap();
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(resp: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

async fn assert_error(resp: axum::response::Response, code: u16, message: &str) {
    assert_eq!(resp.status().as_u16(), code);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], code);
    assert_eq!(json["message"], message);
}

// =============================================================================
// GET /categories
// =============================================================================

#[tokio::test]
async fn test_categories_happy_path() {
    let app = create_router(seeded_state());
    let resp = app.oneshot(get("/categories")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: CategoriesResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(body.success);
    let ids: HashSet<i64> = body.categories.keys().copied().collect();
    assert_eq!(ids, (1..=6).collect());
    assert_eq!(body.categories[&1], "Science");
    assert_eq!(body.categories[&6], "Sports");
}

#[tokio::test]
async fn test_categories_keys_are_json_object_keys() {
    let app = create_router(seeded_state());
    let resp = app.oneshot(get("/categories")).await.unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["categories"]["3"], "Geography");
}

#[tokio::test]
async fn test_categories_empty_returns_404() {
    let app = create_router(make_state());
    let resp = app.oneshot(get("/categories")).await.unwrap();
    assert_error(resp, 404, "resource not found").await;
}

// =============================================================================
// GET /questions
// =============================================================================

#[tokio::test]
async fn test_questions_first_page() {
    let state = seeded_state();
    add_numbered(&state, 12);

    let app = create_router(state);
    let resp = app.oneshot(get("/questions")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: QuestionsResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(body.success);
    assert_eq!(body.questions.len(), 10);
    assert_eq!(body.total_questions, 12);
    assert_eq!(body.categories.len(), 6);
    assert_eq!(body.questions[0].id, 1);
}

#[tokio::test]
async fn test_questions_second_page_holds_remainder() {
    let state = seeded_state();
    add_numbered(&state, 12);

    let app = create_router(state);
    let resp = app.oneshot(get("/questions?page=2")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: QuestionsResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let ids: Vec<i64> = body.questions.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![11, 12]);
    assert_eq!(body.total_questions, 12);
}

#[tokio::test]
async fn test_questions_page_beyond_end_returns_404() {
    let state = seeded_state();
    add_numbered(&state, 12);

    let app = create_router(state);
    let resp = app.oneshot(get("/questions?page=1000")).await.unwrap();
    assert_error(resp, 404, "resource not found").await;
}

#[tokio::test]
async fn test_questions_page_zero_returns_404() {
    let state = seeded_state();
    add_numbered(&state, 3);

    let app = create_router(state);
    let resp = app.oneshot(get("/questions?page=0")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_questions_page_past_u64_returns_404() {
    let state = seeded_state();
    add_numbered(&state, 12);

    let app = create_router(state);
    let resp = app
        .oneshot(get("/questions?page=99999999999999999999"))
        .await
        .unwrap();
    assert_error(resp, 404, "resource not found").await;
}

#[tokio::test]
async fn test_questions_none_stored_returns_404() {
    let app = create_router(seeded_state());
    let resp = app.oneshot(get("/questions")).await.unwrap();
    assert_error(resp, 404, "resource not found").await;
}

#[tokio::test]
async fn test_questions_dangling_category_is_listed() {
    let state = seeded_state();
    add_question(&state, "Orphan question", "yes", 99);

    let app = create_router(state);
    let resp = app.oneshot(get("/questions")).await.unwrap();
    let body: QuestionsResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.questions[0].category, 99);
    assert!(!body.categories.contains_key(&99));
}

// =============================================================================
// DELETE /questions/{id}
// =============================================================================

#[tokio::test]
async fn test_delete_question_happy_path() {
    let state = seeded_state();
    add_numbered(&state, 3);

    let app = create_router(state.clone());
    let resp = app.oneshot(delete("/questions/2")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: DeleteResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(body.success);
    assert_eq!(body.deleted, 2);

    // Gone from subsequent listings.
    let app = create_router(state);
    let resp = app.oneshot(get("/questions")).await.unwrap();
    let body: QuestionsResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let ids: Vec<i64> = body.questions.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(body.total_questions, 2);
}

#[tokio::test]
async fn test_delete_twice_returns_404_second_time() {
    let state = seeded_state();
    add_numbered(&state, 1);

    let resp = create_router(state.clone())
        .oneshot(delete("/questions/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = create_router(state)
        .oneshot(delete("/questions/1"))
        .await
        .unwrap();
    assert_error(resp, 404, "resource not found").await;
}

#[tokio::test]
async fn test_delete_unknown_id_returns_404() {
    let app = create_router(seeded_state());
    let resp = app.oneshot(delete("/questions/4242")).await.unwrap();
    assert_error(resp, 404, "resource not found").await;
}

#[tokio::test]
async fn test_delete_store_failure_returns_422() {
    let state = seeded_state();
    drop_questions_table(&state);

    let app = create_router(state);
    let resp = app.oneshot(delete("/questions/1")).await.unwrap();
    assert_error(resp, 422, "unprocessable").await;
}

// =============================================================================
// POST /questions
// =============================================================================

#[tokio::test]
async fn test_create_question_happy_path() {
    let state = seeded_state();
    add_numbered(&state, 2);

    let app = create_router(state.clone());
    let resp = app
        .oneshot(post_json(
            "/questions",
            r#"{"question":"What is the capital of France?","answer":"Paris","difficulty":1,"category":3}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: CreateResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(body.success);
    assert_eq!(body.question_created, "What is the capital of France?");
    assert_eq!(body.total_questions, 3);
    assert_eq!(body.questions.len(), 3);

    let stored = QuestionRepository::new(Arc::clone(&state.database))
        .find_by_id(body.created)
        .unwrap()
        .unwrap();
    assert_eq!(stored.answer, "Paris");
    assert_eq!(stored.category, 3);
    assert_eq!(stored.difficulty, 1);
}

#[tokio::test]
async fn test_create_question_accepts_numeric_strings() {
    let state = seeded_state();
    let app = create_router(state.clone());
    let resp = app
        .oneshot(post_json(
            "/questions",
            r#"{"question":"Q","answer":"A","difficulty":"4","category":"2"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: CreateResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let stored = QuestionRepository::new(Arc::clone(&state.database))
        .find_by_id(body.created)
        .unwrap()
        .unwrap();
    assert_eq!(stored.difficulty, 4);
    assert_eq!(stored.category, 2);
}

#[tokio::test]
async fn test_create_question_returns_first_page_of_full_list() {
    let state = seeded_state();
    add_numbered(&state, 15);

    let app = create_router(state);
    let resp = app
        .oneshot(post_json(
            "/questions",
            r#"{"question":"New","answer":"A","difficulty":1,"category":1}"#,
        ))
        .await
        .unwrap();

    let body: CreateResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.created, 16);
    assert_eq!(body.total_questions, 16);
    let ids: Vec<i64> = body.questions.iter().map(|q| q.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_create_question_missing_difficulty_returns_422() {
    let state = seeded_state();
    let app = create_router(state.clone());
    let resp = app
        .oneshot(post_json(
            "/questions",
            r#"{"question":"Q","answer":"A","category":1}"#,
        ))
        .await
        .unwrap();
    assert_error(resp, 422, "unprocessable").await;

    let count = QuestionRepository::new(Arc::clone(&state.database))
        .count()
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_create_question_empty_body_returns_422() {
    let app = create_router(seeded_state());
    let resp = app.oneshot(post_json("/questions", "{}")).await.unwrap();
    assert_error(resp, 422, "unprocessable").await;
}

#[tokio::test]
async fn test_create_question_malformed_json_returns_422() {
    let app = create_router(seeded_state());
    let resp = app
        .oneshot(post_json("/questions", "{not json"))
        .await
        .unwrap();
    assert_error(resp, 422, "unprocessable").await;
}

#[tokio::test]
async fn test_create_question_missing_text_is_stored_empty() {
    let app = create_router(seeded_state());
    let resp = app
        .oneshot(post_json("/questions", r#"{"difficulty":1,"category":1}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: CreateResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.question_created, "");
}

// =============================================================================
// POST /questions/search
// =============================================================================

fn search_state() -> AppState {
    let state = seeded_state();
    add_question(&state, "What is the largest lake in Africa?", "Lake Victoria", 3);
    add_question(&state, "Who painted the Mona Lisa?", "Leonardo da Vinci", 2);
    add_question(&state, "What is the heaviest organ in the human body?", "The Liver", 1);
    state
}

#[tokio::test]
async fn test_search_single_match() {
    let app = create_router(search_state());
    let resp = app
        .oneshot(post_json("/questions/search", r#"{"searchTerm":"mona LISA"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: SearchResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(body.success);
    assert_eq!(body.total_questions, 1);
    assert_eq!(body.questions[0].id, 2);
    assert!(body.current_category.is_none());
}

#[tokio::test]
async fn test_search_current_category_is_null() {
    let app = create_router(search_state());
    let resp = app
        .oneshot(post_json("/questions/search", r#"{"searchTerm":"what"}"#))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert!(json["current_category"].is_null());
    assert_eq!(json["total_questions"], 2);
}

#[tokio::test]
async fn test_search_no_match_returns_empty() {
    let app = create_router(search_state());
    let resp = app
        .oneshot(post_json("/questions/search", r#"{"searchTerm":"penguin"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: SearchResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(body.questions.is_empty());
    assert_eq!(body.total_questions, 0);
}

#[tokio::test]
async fn test_search_does_not_match_answers() {
    let app = create_router(search_state());
    let resp = app
        .oneshot(post_json("/questions/search", r#"{"searchTerm":"Leonardo"}"#))
        .await
        .unwrap();
    let body: SearchResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.total_questions, 0);
}

#[tokio::test]
async fn test_search_empty_and_absent_term_match_nothing() {
    for json in [r#"{"searchTerm":""}"#, r#"{"searchTerm":"  "}"#, "{}"] {
        let app = create_router(search_state());
        let resp = app
            .oneshot(post_json("/questions/search", json))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "body {}", json);
        let body: SearchResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(body.total_questions, 0, "body {}", json);
        assert!(body.questions.is_empty());
    }
}

#[tokio::test]
async fn test_search_paginates_matches() {
    let state = seeded_state();
    add_numbered(&state, 13);

    let app = create_router(state);
    let resp = app
        .oneshot(post_json(
            "/questions/search?page=2",
            r#"{"searchTerm":"number"}"#,
        ))
        .await
        .unwrap();
    let body: SearchResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.total_questions, 13);
    assert_eq!(body.questions.len(), 3);
}

#[tokio::test]
async fn test_search_malformed_body_returns_404() {
    let app = create_router(search_state());
    let resp = app
        .oneshot(post_json("/questions/search", "nope"))
        .await
        .unwrap();
    assert_error(resp, 404, "resource not found").await;
}

// =============================================================================
// GET /categories/{id}/questions
// =============================================================================

#[tokio::test]
async fn test_category_questions_happy_path() {
    let state = seeded_state();
    add_numbered(&state, 5); // ids 1, 3, 5 in category 1; 2, 4 in category 2

    let app = create_router(state);
    let resp = app.oneshot(get("/categories/2/questions")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: CategoryQuestionsResponse =
        serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(body.success);
    let ids: Vec<i64> = body.questions.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![2, 4]);
    assert_eq!(body.current_category, "Art");
    // Global count, not the per-category count.
    assert_eq!(body.total_questions, 5);
}

#[tokio::test]
async fn test_category_questions_empty_category() {
    let state = seeded_state();
    add_numbered(&state, 2);

    let app = create_router(state);
    let resp = app.oneshot(get("/categories/6/questions")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: CategoryQuestionsResponse =
        serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(body.questions.is_empty());
    assert_eq!(body.current_category, "Sports");
}

#[tokio::test]
async fn test_category_questions_unknown_category_returns_404() {
    let app = create_router(seeded_state());
    let resp = app.oneshot(get("/categories/77/questions")).await.unwrap();
    assert_error(resp, 404, "resource not found").await;
}

#[tokio::test]
async fn test_category_questions_store_failure_returns_400() {
    let state = seeded_state();
    drop_questions_table(&state);

    let app = create_router(state);
    let resp = app.oneshot(get("/categories/1/questions")).await.unwrap();
    assert_error(resp, 400, "bad request").await;
}

// =============================================================================
// POST /quizzes
// =============================================================================

#[tokio::test]
async fn test_quiz_any_category_excludes_previous() {
    let state = seeded_state();
    add_numbered(&state, 4);

    for _ in 0..20 {
        let app = create_router(state.clone());
        let resp = app
            .oneshot(post_json(
                "/quizzes",
                r#"{"previous_questions":[1,2,3],"quiz_category":{"id":0,"type":"click"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body: QuizResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert!(body.success);
        assert_eq!(body.question.unwrap().id, 4);
    }
}

#[tokio::test]
async fn test_quiz_category_filter() {
    let state = seeded_state();
    add_numbered(&state, 6); // category 2 holds ids 2, 4, 6

    for _ in 0..20 {
        let app = create_router(state.clone());
        let resp = app
            .oneshot(post_json(
                "/quizzes",
                r#"{"previous_questions":[2],"quiz_category":{"id":"2","type":"Art"}}"#,
            ))
            .await
            .unwrap();

        let body: QuizResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        let question = body.question.unwrap();
        assert_eq!(question.category, 2);
        assert_ne!(question.id, 2);
    }
}

#[tokio::test]
async fn test_quiz_without_category_draws_from_all() {
    let state = seeded_state();
    add_numbered(&state, 2);

    let app = create_router(state);
    let resp = app
        .oneshot(post_json(
            "/quizzes",
            r#"{"previous_questions":[1],"quiz_category":null}"#,
        ))
        .await
        .unwrap();
    let body: QuizResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body.question.unwrap().id, 2);
}

#[tokio::test]
async fn test_quiz_exhausted_pool_returns_null_question() {
    let state = seeded_state();
    add_numbered(&state, 3);

    let app = create_router(state);
    let resp = app
        .oneshot(post_json(
            "/quizzes",
            r#"{"previous_questions":[1,2,3],"quiz_category":{"id":0,"type":"click"}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert!(json["question"].is_null());
}

#[tokio::test]
async fn test_quiz_category_without_id_returns_422() {
    let state = seeded_state();
    add_numbered(&state, 3);

    let app = create_router(state);
    let resp = app
        .oneshot(post_json(
            "/quizzes",
            r#"{"previous_questions":[],"quiz_category":{"type":"Science"}}"#,
        ))
        .await
        .unwrap();
    assert_error(resp, 422, "unprocessable").await;
}

#[tokio::test]
async fn test_quiz_store_failure_returns_422() {
    let state = seeded_state();
    drop_questions_table(&state);

    let app = create_router(state);
    let resp = app
        .oneshot(post_json("/quizzes", r#"{"previous_questions":[]}"#))
        .await
        .unwrap();
    assert_error(resp, 422, "unprocessable").await;
}

// =============================================================================
// Routing, CORS, fallbacks
// =============================================================================

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let app = create_router(make_state());
    let resp = app.oneshot(get("/nope")).await.unwrap();
    assert_error(resp, 404, "resource not found").await;
}

#[tokio::test]
async fn test_wrong_method_returns_json_405() {
    let app = create_router(seeded_state());
    let resp = app
        .oneshot(post_json("/categories", "{}"))
        .await
        .unwrap();
    assert_error(resp, 405, "method not allowed").await;
}

#[tokio::test]
async fn test_get_on_question_id_returns_405() {
    let state = seeded_state();
    add_numbered(&state, 1);

    let app = create_router(state);
    let resp = app.oneshot(get("/questions/1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let app = create_router(make_state());
    let resp = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/questions")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "DELETE")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    for method in ["GET", "POST", "PATCH", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "missing {} in {}", method, methods);
    }
    let allowed = headers["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("content-type"));
    assert!(allowed.contains("authorization"));
}

#[tokio::test]
async fn test_simple_request_carries_cors_header() {
    let app = create_router(seeded_state());
    let resp = app
        .oneshot(
            Request::get("/categories")
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}
