use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use mangaverse_core::{CatalogSort, SanitizedConfig, TitleQuery, TitleRecord};

use super::{api_error, ApiError};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /metrics
///
/// Prometheus text exposition.
pub async fn metrics() -> String {
    crate::metrics::render()
}

/// Number of recently added titles on the home page.
const HOME_RECENT_LIMIT: u32 = 8;
/// Number of top-rated titles on the home page.
const HOME_TOP_RATED_LIMIT: u32 = 6;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    pub recent: Vec<TitleRecord>,
    pub top_rated: Vec<TitleRecord>,
}

/// GET /api/v1/home
///
/// Recently added and top-rated titles for the landing page.
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Json<HomeResponse>, ApiError> {
    let catalog = state.catalog();

    let recent = catalog
        .query(&TitleQuery {
            sort: CatalogSort::Newest,
            limit: Some(HOME_RECENT_LIMIT),
            ..TitleQuery::default()
        })
        .map_err(|e| api_error(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let top_rated = catalog
        .query(&TitleQuery {
            sort: CatalogSort::TopRated,
            limit: Some(HOME_TOP_RATED_LIMIT),
            ..TitleQuery::default()
        })
        .map_err(|e| api_error(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(HomeResponse { recent, top_rated }))
}
