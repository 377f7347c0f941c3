use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use super::{created, ok, ApiError, ApiJson, SearchParams, Success};
use fyyur_core::booking::{self, VenueDetail, VenueForm};
use fyyur_core::geo::{self, Area};
use fyyur_core::search::{self, SearchKind, SearchResults};
use fyyur_core::{store, Affected};
use fyyur_db::entities::venue;
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct AreasResponse {
    pub areas: Vec<Area>,
}

#[derive(Debug, Serialize)]
pub struct VenueResponse {
    pub venue: VenueDetail,
}

#[derive(Debug, Serialize)]
pub struct VenueFormResponse {
    pub id: i32,
    pub venue: VenueForm,
}

/// GET /api/venues
pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Success<AreasResponse>>, ApiError> {
    let areas = geo::group_venues(&state.db, Utc::now()).await?;
    Ok(ok(AreasResponse { areas }))
}

/// GET /api/venues/search?search_term=
pub async fn search_venues(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Success<SearchResults>>, ApiError> {
    let results =
        search::search(&state.db, SearchKind::Venue, &params.search_term, Utc::now()).await?;
    Ok(ok(results))
}

/// GET /api/venues/{id}
pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Success<VenueResponse>>, ApiError> {
    let venue = booking::venue_detail(&state.db, id, Utc::now()).await?;
    Ok(ok(VenueResponse { venue }))
}

/// GET /api/venues/{id}/edit
pub async fn edit_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Success<VenueFormResponse>>, ApiError> {
    let model = store::require::<venue::Entity, _>(&state.db, "venue", id).await?;
    Ok(ok(VenueFormResponse {
        id,
        venue: VenueForm::from(model),
    }))
}

/// POST /api/venues
pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    ApiJson(form): ApiJson<VenueForm>,
) -> Result<(StatusCode, Json<Success<Affected>>), ApiError> {
    let affected = booking::create_venue(&state.db, form).await.into_result()?;
    Ok(created(affected))
}

/// PUT /api/venues/{id}
pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ApiJson(form): ApiJson<VenueForm>,
) -> Result<Json<Success<Affected>>, ApiError> {
    let affected = booking::update_venue(&state.db, id, form).await.into_result()?;
    Ok(ok(affected))
}

/// DELETE /api/venues/{id}
pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Success<Affected>>, ApiError> {
    let affected = booking::delete_venue(&state.db, id).await.into_result()?;
    Ok(ok(affected))
}
