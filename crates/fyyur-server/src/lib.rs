pub mod api;
pub mod config;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use fyyur_db::AppState;

#[derive(Serialize)]
struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn api_routes() -> Router<Arc<AppState>> {
    let booking = Router::new()
        .route(
            "/venues",
            get(api::venues::list_venues).post(api::venues::create_venue),
        )
        .route("/venues/search", get(api::venues::search_venues))
        .route(
            "/venues/{id}",
            get(api::venues::get_venue)
                .put(api::venues::update_venue)
                .delete(api::venues::delete_venue),
        )
        .route("/venues/{id}/edit", get(api::venues::edit_venue))
        .route(
            "/artists",
            get(api::artists::list_artists).post(api::artists::create_artist),
        )
        .route("/artists/search", get(api::artists::search_artists))
        .route(
            "/artists/{id}",
            get(api::artists::get_artist)
                .put(api::artists::update_artist)
                .delete(api::artists::delete_artist),
        )
        .route("/artists/{id}/edit", get(api::artists::edit_artist))
        .route(
            "/shows",
            get(api::shows::list_shows).post(api::shows::create_show),
        );

    let trivia = Router::new()
        .route(
            "/categories",
            get(api::trivia::list_categories).post(api::trivia::create_category),
        )
        .route(
            "/categories/{id}",
            axum::routing::delete(api::trivia::delete_category),
        )
        .route(
            "/categories/{id}/questions",
            get(api::trivia::category_questions),
        )
        .route(
            "/questions",
            get(api::trivia::list_questions).post(api::trivia::post_questions),
        )
        .route(
            "/questions/{id}",
            axum::routing::delete(api::trivia::delete_question),
        )
        .route("/quizzes", post(api::trivia::next_quiz_question));

    let coffee = Router::new()
        .route(
            "/drinks",
            get(api::drinks::list_drinks).post(api::drinks::create_drink),
        )
        .route("/drinks-detail", get(api::drinks::list_drinks_detail))
        .route(
            "/drinks/{id}",
            axum::routing::patch(api::drinks::update_drink).delete(api::drinks::delete_drink),
        );

    booking.merge(trivia).merge(coffee)
}

/// CORS layer for the configured origins; an empty list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        tracing::info!("CORS allowed origins: {:?}", parsed);
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .with_state(state)
}
