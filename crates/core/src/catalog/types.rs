//! Types for the title catalog.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Publication status of a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TitleStatus {
    #[default]
    Ongoing,
    Completed,
    Hiatus,
}

impl TitleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleStatus::Ongoing => "Ongoing",
            TitleStatus::Completed => "Completed",
            TitleStatus::Hiatus => "Hiatus",
        }
    }

    /// Parse a stored status, falling back to `Ongoing` for unknown text.
    pub fn parse(s: &str) -> Self {
        match s {
            "Completed" => TitleStatus::Completed,
            "Hiatus" => TitleStatus::Hiatus,
            _ => TitleStatus::Ongoing,
        }
    }
}

/// One catalog entry.
///
/// Field names in JSON follow the document layout the rendering surfaces
/// consume: `rating` is the maintained average, `reviews` the number of
/// ratings, `views` the view counter and `addedAt` the creation time.
/// Optional fields default at deserialization, so consumers never need
/// to guard against their absence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleRecord {
    /// Stable identifier, assigned at creation.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub alt_titles: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Type tag, e.g. "Manga" or "Manhwa".
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: TitleStatus,
    #[serde(default)]
    pub chapters: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    /// Mean of all stored ratings; 0 while unrated.
    #[serde(default, rename = "rating")]
    pub average_rating: f64,
    #[serde(default, rename = "reviews")]
    pub rating_count: u32,
    #[serde(default, rename = "views")]
    pub view_count: u64,
    /// Trend score per period key ("day", "week", "month", ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub trending: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
impl TitleRecord {
    /// Minimal record for ranking tests.
    pub(crate) fn test_default() -> Self {
        Self {
            id: "test".to_string(),
            title: String::new(),
            alt_titles: Vec::new(),
            author: String::new(),
            description: String::new(),
            cover_image: None,
            genres: Vec::new(),
            kind: String::new(),
            status: TitleStatus::Ongoing,
            chapters: 0,
            publication_year: None,
            average_rating: 0.0,
            rating_count: 0,
            view_count: 0,
            trending: BTreeMap::new(),
            added_at: None,
        }
    }
}

/// A new catalog entry, before an id and timestamps are assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTitle {
    pub title: String,
    #[serde(default)]
    pub alt_titles: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: TitleStatus,
    #[serde(default)]
    pub chapters: u32,
    #[serde(default)]
    pub publication_year: Option<i32>,
    /// Initial view counter (seed data carries non-zero values).
    #[serde(default, rename = "views")]
    pub view_count: u64,
    #[serde(default)]
    pub trending: BTreeMap<String, f64>,
}

/// One user's rating of one title. At most one entry per (title, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub title_id: String,
    pub user_id: String,
    /// Integer value from 1 to 5.
    pub value: u8,
    pub rated_at: DateTime<Utc>,
}

/// Filter and ordering for catalog listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<TitleStatus>,
    #[serde(default)]
    pub sort: CatalogSort,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
    /// Alphabetical by title.
    #[default]
    Title,
    /// Most recently added first.
    Newest,
    /// Highest average rating first, ties by rating count.
    TopRated,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Title not found: {0}")]
    NotFound(String),

    #[error("Invalid rating value: {0}")]
    InvalidRating(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_record_json_field_names() {
        let mut title = TitleRecord::test_default();
        title.id = "abc".to_string();
        title.title = "One Piece".to_string();
        title.alt_titles = vec!["OP".to_string()];
        title.kind = "Manga".to_string();
        title.average_rating = 4.5;
        title.rating_count = 12;
        title.view_count = 3400;
        title.added_at = Some(Utc::now());

        let json = serde_json::to_value(&title).unwrap();
        assert_eq!(json["rating"], 4.5);
        assert_eq!(json["reviews"], 12);
        assert_eq!(json["views"], 3400);
        assert_eq!(json["type"], "Manga");
        assert_eq!(json["altTitles"][0], "OP");
        assert!(json.get("addedAt").is_some());
        // Empty optionals are omitted entirely.
        assert!(json.get("coverImage").is_none());
        assert!(json.get("trending").is_none());
    }

    #[test]
    fn test_title_record_defaults_on_ingest() {
        let json = r#"{"id": "x", "title": "Berserk"}"#;
        let title: TitleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(title.title, "Berserk");
        assert!(title.alt_titles.is_empty());
        assert!(title.genres.is_empty());
        assert_eq!(title.status, TitleStatus::Ongoing);
        assert_eq!(title.average_rating, 0.0);
        assert_eq!(title.rating_count, 0);
        assert!(title.trending.is_empty());
        assert!(title.added_at.is_none());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            TitleStatus::Ongoing,
            TitleStatus::Completed,
            TitleStatus::Hiatus,
        ] {
            assert_eq!(TitleStatus::parse(status.as_str()), status);
        }
        assert_eq!(TitleStatus::parse("garbage"), TitleStatus::Ongoing);
    }

    #[test]
    fn test_status_serializes_capitalized() {
        let json = serde_json::to_string(&TitleStatus::Hiatus).unwrap();
        assert_eq!(json, "\"Hiatus\"");
    }

    #[test]
    fn test_catalog_sort_default() {
        assert_eq!(CatalogSort::default(), CatalogSort::Title);
    }
}
