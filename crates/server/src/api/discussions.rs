//! Discussion thread handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use mangaverse_core::{CatalogError, DiscussionThread, NewThread, ThreadError};

use super::{api_error, ApiError, RequireUser};
use crate::state::AppState;

/// Threads shown on the discussions index.
const LIST_LIMIT: u32 = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadListResponse {
    pub threads: Vec<DiscussionThread>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

fn thread_error(e: ThreadError) -> ApiError {
    match e {
        ThreadError::NotFound(id) => {
            api_error(StatusCode::NOT_FOUND, format!("Discussion not found: {}", id))
        }
        ThreadError::InvalidInput(msg) => api_error(StatusCode::BAD_REQUEST, msg),
        ThreadError::Database(msg) => api_error(StatusCode::INTERNAL_SERVER_ERROR, msg),
    }
}

/// GET /api/v1/discussions
///
/// Most recently active threads.
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ThreadListResponse>, ApiError> {
    let threads = state.threads().recent(LIST_LIMIT).map_err(thread_error)?;
    let total = threads.len();
    Ok(Json(ThreadListResponse { threads, total }))
}

/// POST /api/v1/discussions
///
/// Create a thread about a title.
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    RequireUser(identity): RequireUser,
    Json(request): Json<NewThread>,
) -> Result<(StatusCode, Json<DiscussionThread>), ApiError> {
    // The referenced title must exist.
    state.catalog().get(&request.title_id).map_err(|e| match e {
        CatalogError::NotFound(id) => {
            api_error(StatusCode::NOT_FOUND, format!("Title not found: {}", id))
        }
        _ => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    })?;

    let thread = state
        .threads()
        .create(request, &identity.user_id, &identity.username, Utc::now())
        .map_err(thread_error)?;

    Ok((StatusCode::CREATED, Json(thread)))
}

/// GET /api/v1/discussions/{id}
///
/// Thread detail with replies. Increments the view counter.
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DiscussionThread>, ApiError> {
    let store = state.threads();
    store.increment_views(&id).map_err(thread_error)?;
    let thread = store.get(&id).map_err(thread_error)?;
    Ok(Json(thread))
}

/// POST /api/v1/discussions/{id}/replies
pub async fn add_reply(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    RequireUser(identity): RequireUser,
    Json(request): Json<ReplyRequest>,
) -> Result<(StatusCode, Json<DiscussionThread>), ApiError> {
    let thread = state
        .threads()
        .add_reply(
            &id,
            &identity.user_id,
            &identity.username,
            &request.content,
            Utc::now(),
        )
        .map_err(thread_error)?;

    Ok((StatusCode::CREATED, Json(thread)))
}

/// DELETE /api/v1/discussions/{id}
///
/// Delete a thread. Only the author may do this.
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    RequireUser(identity): RequireUser,
) -> Result<Json<SuccessResponse>, ApiError> {
    let store = state.threads();
    let thread = store.get(&id).map_err(thread_error)?;

    if thread.user_id != identity.user_id {
        return Err(api_error(
            StatusCode::FORBIDDEN,
            "You can only delete your own discussions",
        ));
    }

    store.delete(&id).map_err(thread_error)?;
    Ok(Json(SuccessResponse {
        message: "Discussion deleted".to_string(),
    }))
}
