//! Title listing, detail and rating handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use mangaverse_core::{CatalogError, DiscussionThread, TitleRecord};

use super::{api_error, ApiError, CurrentUser, RequireUser};
use crate::metrics::RATINGS_SUBMITTED_TOTAL;
use crate::state::AppState;

/// Threads shown on a title's detail page.
const DETAIL_THREAD_LIMIT: u32 = 5;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleListResponse {
    pub titles: Vec<TitleRecord>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleDetailResponse {
    #[serde(flatten)]
    pub title: TitleRecord,
    /// The caller's own rating, 0 when absent or logged out.
    pub user_rating: u8,
    pub threads: Vec<DiscussionThread>,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResponse {
    pub success: bool,
    pub average_rating: f64,
    pub rating_count: u32,
}

fn catalog_error(e: CatalogError) -> ApiError {
    match e {
        CatalogError::NotFound(id) => {
            api_error(StatusCode::NOT_FOUND, format!("Title not found: {}", id))
        }
        CatalogError::InvalidRating(_) => {
            api_error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid rating value")
        }
        CatalogError::Database(msg) => api_error(StatusCode::INTERNAL_SERVER_ERROR, msg),
    }
}

/// GET /api/v1/titles
///
/// All titles, ordered alphabetically.
pub async fn list_titles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TitleListResponse>, ApiError> {
    let titles = state.catalog().all().map_err(catalog_error)?;
    let total = titles.len();
    Ok(Json(TitleListResponse { titles, total }))
}

/// GET /api/v1/titles/{id}
///
/// Title detail. Increments the view counter and includes the caller's
/// own rating plus the newest discussion threads.
pub async fn get_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<TitleDetailResponse>, ApiError> {
    let catalog = state.catalog();

    catalog.increment_views(&id).map_err(catalog_error)?;
    let title = catalog.get(&id).map_err(catalog_error)?;

    let user_rating = match &identity {
        Some(identity) => catalog
            .user_rating(&id, &identity.user_id)
            .map_err(catalog_error)?
            .map(|entry| entry.value)
            .unwrap_or(0),
        None => 0,
    };

    let threads = state
        .threads()
        .for_title(&id, DETAIL_THREAD_LIMIT)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(TitleDetailResponse {
        title,
        user_rating,
        threads,
    }))
}

/// POST /api/v1/titles/{id}/rate
///
/// Submit or replace the caller's rating for a title.
pub async fn rate_title(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    RequireUser(identity): RequireUser,
    Json(request): Json<RateRequest>,
) -> Result<Json<RateResponse>, ApiError> {
    let update = state
        .catalog()
        .submit_rating(&id, &identity.user_id, request.rating, Utc::now())
        .map_err(|e| {
            let outcome = match &e {
                CatalogError::InvalidRating(_) => "invalid",
                CatalogError::NotFound(_) => "not_found",
                CatalogError::Database(_) => "error",
            };
            RATINGS_SUBMITTED_TOTAL.with_label_values(&[outcome]).inc();
            catalog_error(e)
        })?;

    RATINGS_SUBMITTED_TOTAL.with_label_values(&["ok"]).inc();

    Ok(Json(RateResponse {
        success: true,
        average_rating: update.average_rating,
        rating_count: update.rating_count,
    }))
}
