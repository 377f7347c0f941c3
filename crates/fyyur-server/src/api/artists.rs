use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use super::{created, ok, ApiError, ApiJson, SearchParams, Success};
use fyyur_core::booking::{self, ArtistDetail, ArtistForm};
use fyyur_core::search::{self, SearchKind, SearchResults, Summary};
use fyyur_core::{store, Affected};
use fyyur_db::entities::artist;
use fyyur_db::AppState;

#[derive(Debug, Serialize)]
pub struct ArtistsResponse {
    pub artists: Vec<Summary>,
}

#[derive(Debug, Serialize)]
pub struct ArtistResponse {
    pub artist: ArtistDetail,
}

#[derive(Debug, Serialize)]
pub struct ArtistFormResponse {
    pub id: i32,
    pub artist: ArtistForm,
}

/// GET /api/artists
pub async fn list_artists(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Success<ArtistsResponse>>, ApiError> {
    let artists = booking::list_artists(&state.db, Utc::now()).await?;
    Ok(ok(ArtistsResponse { artists }))
}

/// GET /api/artists/search?search_term=
pub async fn search_artists(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Success<SearchResults>>, ApiError> {
    let results =
        search::search(&state.db, SearchKind::Artist, &params.search_term, Utc::now()).await?;
    Ok(ok(results))
}

/// GET /api/artists/{id}
pub async fn get_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Success<ArtistResponse>>, ApiError> {
    let artist = booking::artist_detail(&state.db, id, Utc::now()).await?;
    Ok(ok(ArtistResponse { artist }))
}

/// GET /api/artists/{id}/edit
pub async fn edit_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Success<ArtistFormResponse>>, ApiError> {
    let model = store::require::<artist::Entity, _>(&state.db, "artist", id).await?;
    Ok(ok(ArtistFormResponse {
        id,
        artist: ArtistForm::from(model),
    }))
}

/// POST /api/artists
pub async fn create_artist(
    State(state): State<Arc<AppState>>,
    ApiJson(form): ApiJson<ArtistForm>,
) -> Result<(StatusCode, Json<Success<Affected>>), ApiError> {
    let affected = booking::create_artist(&state.db, form).await.into_result()?;
    Ok(created(affected))
}

/// PUT /api/artists/{id}
pub async fn update_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ApiJson(form): ApiJson<ArtistForm>,
) -> Result<Json<Success<Affected>>, ApiError> {
    let affected = booking::update_artist(&state.db, id, form).await.into_result()?;
    Ok(ok(affected))
}

/// DELETE /api/artists/{id}
pub async fn delete_artist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Success<Affected>>, ApiError> {
    let affected = booking::delete_artist(&state.db, id).await.into_result()?;
    Ok(ok(affected))
}
