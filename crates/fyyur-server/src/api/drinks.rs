use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::{created, ok, ApiError, ApiJson, Success};
use fyyur_core::drinks::{self, DrinkForm, DrinkLong, DrinkShort};
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T: Serialize> {
    pub drinks: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub delete: i32,
}

/// GET /api/drinks
pub async fn list_drinks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Success<DrinksResponse<DrinkShort>>>, ApiError> {
    let drinks = drinks::list_drinks(&state.db).await?;
    Ok(ok(DrinksResponse { drinks }))
}

/// GET /api/drinks-detail
pub async fn list_drinks_detail(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Success<DrinksResponse<DrinkLong>>>, ApiError> {
    let drinks = drinks::list_drinks_detail(&state.db).await?;
    Ok(ok(DrinksResponse { drinks }))
}

/// POST /api/drinks
pub async fn create_drink(
    State(state): State<Arc<AppState>>,
    ApiJson(form): ApiJson<DrinkForm>,
) -> Result<(StatusCode, Json<Success<DrinksResponse<DrinkLong>>>), ApiError> {
    let drink = drinks::create_drink(&state.db, form).await.into_result()?;
    Ok(created(DrinksResponse {
        drinks: vec![drink],
    }))
}

/// PATCH /api/drinks/{id}
pub async fn update_drink(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ApiJson(form): ApiJson<DrinkForm>,
) -> Result<Json<Success<DrinksResponse<DrinkLong>>>, ApiError> {
    let drink = drinks::update_drink(&state.db, id, form).await.into_result()?;
    Ok(ok(DrinksResponse {
        drinks: vec![drink],
    }))
}

/// DELETE /api/drinks/{id}
pub async fn delete_drink(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Success<DeletedResponse>>, ApiError> {
    let affected = drinks::delete_drink(&state.db, id).await.into_result()?;
    Ok(ok(DeletedResponse {
        delete: affected.id(),
    }))
}
