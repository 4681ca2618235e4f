//! SQLite-backed title catalog implementation.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{
    CatalogError, CatalogSort, CatalogStore, NewTitle, RatingEntry, TitleQuery, TitleRecord,
    TitleStatus,
};
use crate::ranking::{apply_rating, RatingError, RatingUpdate};

/// SQLite-backed title catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Create a new SQLite catalog, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path).map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn =
            Connection::open_in_memory().map_err(|e| CatalogError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            -- Catalog entries (one row per title)
            CREATE TABLE IF NOT EXISTS titles (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                alt_titles TEXT NOT NULL DEFAULT '[]',
                author TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                cover_image TEXT,
                genres TEXT NOT NULL DEFAULT '[]',
                kind TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'Ongoing',
                chapters INTEGER NOT NULL DEFAULT 0,
                publication_year INTEGER,
                average_rating REAL NOT NULL DEFAULT 0,
                rating_count INTEGER NOT NULL DEFAULT 0,
                view_count INTEGER NOT NULL DEFAULT 0,
                trending TEXT NOT NULL DEFAULT '{}',
                added_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_titles_title ON titles(title);
            CREATE INDEX IF NOT EXISTS idx_titles_added_at ON titles(added_at);
            CREATE INDEX IF NOT EXISTS idx_titles_rating ON titles(average_rating, rating_count);

            -- One rating per (title, user); resubmission overwrites
            CREATE TABLE IF NOT EXISTS ratings (
                title_id TEXT NOT NULL REFERENCES titles(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL,
                value INTEGER NOT NULL,
                rated_at TEXT NOT NULL,
                PRIMARY KEY (title_id, user_id)
            );

            CREATE INDEX IF NOT EXISTS idx_ratings_title ON ratings(title_id);
            "#,
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(())
    }

    /// Load all rating entries for a title.
    fn load_ratings(conn: &Connection, title_id: &str) -> Result<Vec<RatingEntry>, CatalogError> {
        let mut stmt = conn
            .prepare(
                "SELECT title_id, user_id, value, rated_at FROM ratings
                 WHERE title_id = ? ORDER BY rated_at",
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![title_id], Self::row_to_rating)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(entries)
    }

    fn row_to_rating(row: &rusqlite::Row) -> rusqlite::Result<RatingEntry> {
        let rated_at_str: String = row.get(3)?;
        let rated_at = DateTime::parse_from_rfc3339(&rated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(RatingEntry {
            title_id: row.get(0)?,
            user_id: row.get(1)?,
            value: row.get(2)?,
            rated_at,
        })
    }

    /// Convert a row to TitleRecord. JSON columns degrade to empty on parse failure.
    fn row_to_title(row: &rusqlite::Row) -> rusqlite::Result<TitleRecord> {
        let alt_titles_json: String = row.get(2)?;
        let genres_json: String = row.get(6)?;
        let status_str: String = row.get(8)?;
        let trending_json: String = row.get(14)?;
        let added_at_str: String = row.get(15)?;

        let alt_titles: Vec<String> = serde_json::from_str(&alt_titles_json).unwrap_or_default();
        let genres: Vec<String> = serde_json::from_str(&genres_json).unwrap_or_default();
        let trending: BTreeMap<String, f64> =
            serde_json::from_str(&trending_json).unwrap_or_default();
        let added_at = DateTime::parse_from_rfc3339(&added_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .ok();

        Ok(TitleRecord {
            id: row.get(0)?,
            title: row.get(1)?,
            alt_titles,
            author: row.get(3)?,
            description: row.get(4)?,
            cover_image: row.get(5)?,
            genres,
            kind: row.get(7)?,
            status: TitleStatus::parse(&status_str),
            chapters: row.get(9)?,
            publication_year: row.get(10)?,
            average_rating: row.get(11)?,
            rating_count: row.get(12)?,
            view_count: row.get(13)?,
            trending,
            added_at,
        })
    }

    const TITLE_COLUMNS: &'static str = "id, title, alt_titles, author, description, cover_image, \
         genres, kind, status, chapters, publication_year, average_rating, rating_count, \
         view_count, trending, added_at";
}

impl CatalogStore for SqliteCatalog {
    fn insert(&self, title: NewTitle, now: DateTime<Utc>) -> Result<TitleRecord, CatalogError> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        let alt_titles_json = serde_json::to_string(&title.alt_titles)
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        let genres_json = serde_json::to_string(&title.genres)
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        let trending_json = serde_json::to_string(&title.trending)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO titles (id, title, alt_titles, author, description, cover_image, genres,
                                 kind, status, chapters, publication_year, view_count, trending,
                                 added_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                &id,
                &title.title,
                &alt_titles_json,
                &title.author,
                &title.description,
                &title.cover_image,
                &genres_json,
                &title.kind,
                title.status.as_str(),
                title.chapters,
                title.publication_year,
                title.view_count as i64,
                &trending_json,
                &now.to_rfc3339(),
            ],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        self.get_locked(&conn, &id)
    }

    fn all(&self) -> Result<Vec<TitleRecord>, CatalogError> {
        self.query(&TitleQuery::default())
    }

    fn get(&self, id: &str) -> Result<TitleRecord, CatalogError> {
        let conn = self.conn.lock().unwrap();
        self.get_locked(&conn, id)
    }

    fn query(&self, query: &TitleQuery) -> Result<Vec<TitleRecord>, CatalogError> {
        let conn = self.conn.lock().unwrap();

        let mut sql = format!("SELECT {} FROM titles", Self::TITLE_COLUMNS);
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(kind) = &query.kind {
            clauses.push("LOWER(kind) = LOWER(?)");
            params.push(Box::new(kind.clone()));
        }
        if let Some(status) = query.status {
            clauses.push("status = ?");
            params.push(Box::new(status.as_str().to_string()));
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        sql.push_str(match query.sort {
            CatalogSort::Title => " ORDER BY title COLLATE NOCASE ASC",
            CatalogSort::Newest => " ORDER BY added_at DESC",
            CatalogSort::TopRated => " ORDER BY average_rating DESC, rating_count DESC",
        });

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit));
        }

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CatalogError::Database(e.to_string()))?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params), Self::row_to_title)
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let mut titles = Vec::new();
        for row in rows {
            titles.push(row.map_err(|e| CatalogError::Database(e.to_string()))?);
        }
        Ok(titles)
    }

    fn increment_views(&self, id: &str) -> Result<u64, CatalogError> {
        let conn = self.conn.lock().unwrap();

        let rows_affected = conn
            .execute(
                "UPDATE titles SET view_count = view_count + 1 WHERE id = ?",
                params![id],
            )
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(CatalogError::NotFound(id.to_string()));
        }

        conn.query_row(
            "SELECT view_count FROM titles WHERE id = ?",
            params![id],
            |row| row.get(0),
        )
        .map_err(|e| CatalogError::Database(e.to_string()))
    }

    fn submit_rating(
        &self,
        title_id: &str,
        user_id: &str,
        value: i64,
        now: DateTime<Utc>,
    ) -> Result<RatingUpdate, CatalogError> {
        // The whole read-compute-write sequence runs under the connection
        // lock, so two concurrent submissions cannot interleave and lose
        // an update.
        let conn = self.conn.lock().unwrap();

        let exists: bool = conn
            .query_row("SELECT 1 FROM titles WHERE id = ?", params![title_id], |_| {
                Ok(true)
            })
            .unwrap_or(false);
        if !exists {
            return Err(CatalogError::NotFound(title_id.to_string()));
        }

        let existing = Self::load_ratings(&conn, title_id)?;
        let update = apply_rating(&existing, title_id, user_id, value, now).map_err(|e| match e {
            RatingError::InvalidRating(v) => CatalogError::InvalidRating(v),
        })?;

        conn.execute(
            "INSERT INTO ratings (title_id, user_id, value, rated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(title_id, user_id) DO UPDATE SET
                value = excluded.value,
                rated_at = excluded.rated_at",
            params![
                &update.entry.title_id,
                &update.entry.user_id,
                update.entry.value,
                &update.entry.rated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        conn.execute(
            "UPDATE titles SET average_rating = ?, rating_count = ? WHERE id = ?",
            params![update.average_rating, update.rating_count, title_id],
        )
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(update)
    }

    fn user_rating(
        &self,
        title_id: &str,
        user_id: &str,
    ) -> Result<Option<RatingEntry>, CatalogError> {
        let conn = self.conn.lock().unwrap();

        match conn.query_row(
            "SELECT title_id, user_id, value, rated_at FROM ratings
             WHERE title_id = ? AND user_id = ?",
            params![title_id, user_id],
            Self::row_to_rating,
        ) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CatalogError::Database(e.to_string())),
        }
    }

    fn ratings(&self, title_id: &str) -> Result<Vec<RatingEntry>, CatalogError> {
        let conn = self.conn.lock().unwrap();
        Self::load_ratings(&conn, title_id)
    }

    fn count(&self) -> Result<u64, CatalogError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM titles", [], |row| row.get(0))
            .map_err(|e| CatalogError::Database(e.to_string()))
    }
}

impl SqliteCatalog {
    fn get_locked(&self, conn: &Connection, id: &str) -> Result<TitleRecord, CatalogError> {
        conn.query_row(
            &format!("SELECT {} FROM titles WHERE id = ?", Self::TITLE_COLUMNS),
            params![id],
            Self::row_to_title,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(id.to_string()),
            _ => CatalogError::Database(e.to_string()),
        })
    }
}
