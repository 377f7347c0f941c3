pub mod artists;
pub mod drinks;
pub mod shows;
pub mod trivia;
pub mod venues;

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fyyur_core::CoreError;
use serde::{Deserialize, Serialize};

/// Error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    /// Request body that is not valid JSON for the endpoint.
    BadRequest(String),
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Core(err) => match err {
                CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
                CoreError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
                CoreError::ConstraintViolation(_) => (StatusCode::CONFLICT, err.to_string()),
                CoreError::Connectivity(detail) => {
                    tracing::error!(%detail, "store unreachable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Service temporarily unavailable".into(),
                    )
                }
                CoreError::Store(detail) => {
                    tracing::error!(%detail, "store failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An unexpected error occurred".into(),
                    )
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::Core(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// `Json` extractor whose rejection uses [`ErrorBody`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Successful response: `{"success": true, ...body}`.
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

pub fn ok<T: Serialize>(body: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        body,
    })
}

pub fn created<T: Serialize>(body: T) -> (StatusCode, Json<Success<T>>) {
    (StatusCode::CREATED, ok(body))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
}

impl PageParams {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub search_term: String,
}
