//! Title catalog - the persistent store of catalog entries and ratings.
//!
//! The catalog owns all persisted title and rating state. Derived views
//! (search, trending, top-rated) are computed elsewhere from snapshots
//! fetched here.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

use chrono::{DateTime, Utc};

use crate::ranking::RatingUpdate;

/// Trait for catalog storage.
pub trait CatalogStore: Send + Sync {
    /// Insert a new title, assigning its id and creation timestamp.
    fn insert(&self, title: NewTitle, now: DateTime<Utc>) -> Result<TitleRecord, CatalogError>;

    /// Fetch every title, ordered alphabetically.
    fn all(&self) -> Result<Vec<TitleRecord>, CatalogError>;

    /// Fetch a single title by id.
    fn get(&self, id: &str) -> Result<TitleRecord, CatalogError>;

    /// Fetch titles matching a filter, ordered and limited.
    fn query(&self, query: &TitleQuery) -> Result<Vec<TitleRecord>, CatalogError>;

    /// Increment a title's view counter, returning the new count.
    fn increment_views(&self, id: &str) -> Result<u64, CatalogError>;

    /// Submit a rating for a title.
    ///
    /// Upserts the user's entry and recomputes the stored aggregate in
    /// one step under the store's lock, so concurrent submissions cannot
    /// observe a half-applied state.
    fn submit_rating(
        &self,
        title_id: &str,
        user_id: &str,
        value: i64,
        now: DateTime<Utc>,
    ) -> Result<RatingUpdate, CatalogError>;

    /// Fetch one user's rating of a title, if any.
    fn user_rating(
        &self,
        title_id: &str,
        user_id: &str,
    ) -> Result<Option<RatingEntry>, CatalogError>;

    /// Fetch all rating entries for a title.
    fn ratings(&self, title_id: &str) -> Result<Vec<RatingEntry>, CatalogError>;

    /// Number of titles in the catalog.
    fn count(&self) -> Result<u64, CatalogError>;
}
