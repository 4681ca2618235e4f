//! Search, trending and top-rated handlers.
//!
//! These are thin wrappers: fetch a catalog snapshot, run the ranking
//! engine over it, shape the result for rendering.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use mangaverse_core::{
    format_rating, format_views, ranking, SortMode, TitleFilter, TitleRecord,
};

use super::{api_error, ApiError};
use crate::metrics::SEARCHES_TOTAL;
use crate::state::AppState;

// ============================================================================
// Search
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchState {
    /// No query was supplied.
    NoQuery,
    /// The query ran but matched nothing.
    NoMatches,
    Ok,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHitResponse {
    pub score: u32,
    #[serde(flatten)]
    pub title: TitleRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub state: SearchState,
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchHitResponse>,
}

/// GET /api/v1/search?q=...
pub async fn search_titles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let titles = state
        .catalog()
        .all()
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let query = params.q.trim().to_string();
    let response = match ranking::search(&query, &titles) {
        ranking::SearchOutcome::NoQuery => SearchResponse {
            state: SearchState::NoQuery,
            query,
            total: 0,
            results: Vec::new(),
        },
        ranking::SearchOutcome::Ranked(hits) => {
            let results: Vec<SearchHitResponse> = hits
                .into_iter()
                .map(|hit| SearchHitResponse {
                    score: hit.score,
                    title: hit.title.clone(),
                })
                .collect();
            SearchResponse {
                state: if results.is_empty() {
                    SearchState::NoMatches
                } else {
                    SearchState::Ok
                },
                query,
                total: results.len(),
                results,
            }
        }
    };

    let outcome = match response.state {
        SearchState::NoQuery => "no_query",
        SearchState::NoMatches => "no_matches",
        SearchState::Ok => "ok",
    };
    SEARCHES_TOTAL.with_label_values(&[outcome]).inc();

    Ok(Json(response))
}

// ============================================================================
// Trending
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    #[serde(default = "default_period")]
    pub period: String,
}

fn default_period() -> String {
    "week".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingEntryResponse {
    pub rank: u32,
    pub podium: bool,
    pub trend_score: f64,
    /// Compact view counter, e.g. "1.5K".
    pub views_label: String,
    pub rating_label: String,
    #[serde(flatten)]
    pub title: TitleRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingResponse {
    pub period: String,
    pub entries: Vec<TrendingEntryResponse>,
}

/// GET /api/v1/trending?period=week
pub async fn trending_titles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let titles = state
        .catalog()
        .all()
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let entries = ranking::trending(&params.period, &titles)
        .into_iter()
        .map(|entry| TrendingEntryResponse {
            rank: entry.rank,
            podium: entry.podium,
            trend_score: entry.trend_score,
            views_label: format_views(entry.title.view_count),
            rating_label: format_rating(entry.title.average_rating),
            title: entry.title.clone(),
        })
        .collect();

    Ok(Json(TrendingResponse {
        period: params.period,
        entries,
    }))
}

// ============================================================================
// Top rated
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TopRatedParams {
    #[serde(default)]
    pub filter: TitleFilter,
    #[serde(default)]
    pub sort: SortMode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodiumEntryResponse {
    pub rank: u32,
    pub medal: ranking::Medal,
    pub rating_label: String,
    #[serde(flatten)]
    pub title: TitleRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntryResponse {
    pub rank: u32,
    pub rating_label: String,
    #[serde(flatten)]
    pub title: TitleRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRatedResponse {
    /// Display order: second place, first place, third place.
    pub podium: Vec<PodiumEntryResponse>,
    pub ranked: Vec<RankedEntryResponse>,
}

/// GET /api/v1/top-rated?filter=all&sort=rating
pub async fn top_rated_titles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopRatedParams>,
) -> Result<Json<TopRatedResponse>, ApiError> {
    let titles = state
        .catalog()
        .all()
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let page = ranking::top_rated(params.filter, params.sort, Utc::now(), &titles);

    let podium = page
        .podium
        .iter()
        .map(|entry| PodiumEntryResponse {
            rank: entry.rank,
            medal: entry.medal,
            rating_label: format_rating(entry.title.average_rating),
            title: entry.title.clone(),
        })
        .collect();

    let ranked = page
        .ranked
        .iter()
        .map(|entry| RankedEntryResponse {
            rank: entry.rank,
            rating_label: format_rating(entry.title.average_rating),
            title: entry.title.clone(),
        })
        .collect();

    Ok(Json(TopRatedResponse { podium, ranked }))
}
