use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{created, ok, ApiError, ApiJson, PageParams, Success};
use fyyur_core::quiz::{self, QuizRequest};
use fyyur_core::trivia::{self, CategoryForm, QuestionForm, QuestionView};
use fyyur_core::{Affected, CoreError, Page};
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: BTreeMap<i32, String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<QuestionView>,
    pub total_questions: u64,
    pub page: u64,
    pub total_pages: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<i32, String>>,
    pub current_category: Option<String>,
}

impl QuestionsResponse {
    fn from_page(page: Page<QuestionView>, current_category: Option<String>) -> Self {
        Self {
            questions: page.data,
            total_questions: page.total,
            page: page.page,
            total_pages: page.total_pages,
            categories: None,
            current_category,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    /// `None` once every qualifying question has been asked.
    pub question: Option<QuestionView>,
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Success<CategoriesResponse>>, ApiError> {
    let categories = trivia::categories(&state.db).await?;
    Ok(ok(CategoriesResponse { categories }))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ApiJson(form): ApiJson<CategoryForm>,
) -> Result<(StatusCode, Json<Success<Affected>>), ApiError> {
    let affected = trivia::create_category(&state.db, form).await.into_result()?;
    Ok(created(affected))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Success<Affected>>, ApiError> {
    let affected = trivia::delete_category(&state.db, id).await.into_result()?;
    Ok(ok(affected))
}

/// GET /api/categories/{id}/questions?page=
pub async fn category_questions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(params): Query<PageParams>,
) -> Result<Json<Success<QuestionsResponse>>, ApiError> {
    let (category, page) =
        trivia::questions_by_category(&state.db, id, params.page(), state.questions_per_page)
            .await?;
    Ok(ok(QuestionsResponse::from_page(page, Some(category.kind))))
}

/// GET /api/questions?page=
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Success<QuestionsResponse>>, ApiError> {
    let page = trivia::list_questions(&state.db, params.page(), state.questions_per_page).await?;
    let categories = trivia::categories(&state.db).await?;
    let mut body = QuestionsResponse::from_page(page, None);
    body.categories = Some(categories);
    Ok(ok(body))
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

/// POST /api/questions
///
/// A body carrying `searchTerm` searches question text; any other body
/// creates a question.
pub async fn post_questions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
    ApiJson(body): ApiJson<Value>,
) -> Result<Response, ApiError> {
    if body.get("searchTerm").is_some() {
        let search: SearchBody = serde_json::from_value(body)
            .map_err(|_| CoreError::validation("searchTerm must be a string"))?;
        let page = trivia::search_questions(
            &state.db,
            &search.search_term,
            params.page(),
            state.questions_per_page,
        )
        .await?;
        return Ok(ok(QuestionsResponse::from_page(page, None)).into_response());
    }

    let form: QuestionForm = serde_json::from_value(body)
        .map_err(|e| CoreError::validation(format!("malformed question: {e}")))?;
    let affected = trivia::create_question(&state.db, form).await.into_result()?;
    Ok(created(affected).into_response())
}

/// DELETE /api/questions/{id}
pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Success<Affected>>, ApiError> {
    let affected = trivia::delete_question(&state.db, id).await.into_result()?;
    Ok(ok(affected))
}

/// POST /api/quizzes
pub async fn next_quiz_question(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<QuizRequest>,
) -> Result<Json<Success<QuizResponse>>, ApiError> {
    let (filter, previous) = request.parse()?;
    let question = quiz::next_question(&state.db, filter, &previous).await?;
    Ok(ok(QuizResponse { question }))
}
