use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use super::{created, ok, ApiError, ApiJson, Success};
use fyyur_core::booking::{self, ShowForm, ShowListing};
use fyyur_core::Affected;
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct ShowsResponse {
    pub shows: Vec<ShowListing>,
}

/// GET /api/shows
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Success<ShowsResponse>>, ApiError> {
    let shows = booking::list_shows(&state.db).await?;
    Ok(ok(ShowsResponse { shows }))
}

/// POST /api/shows
pub async fn create_show(
    State(state): State<Arc<AppState>>,
    ApiJson(form): ApiJson<ShowForm>,
) -> Result<(StatusCode, Json<Success<Affected>>), ApiError> {
    let affected = booking::create_show(&state.db, form).await.into_result()?;
    Ok(created(affected))
}
