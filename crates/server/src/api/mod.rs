mod auth;
mod discussions;
mod handlers;
mod middleware;
mod rankings;
mod routes;
mod titles;

pub use middleware::{CurrentUser, RequireUser};
pub use routes::create_router;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// JSON error body shared by every handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}
