//! SQLite-backed thread store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::types::{validate_reply, validate_thread};
use super::{DiscussionThread, NewThread, Reply, ThreadError, ThreadStore};

/// SQLite-backed thread store.
pub struct SqliteThreadStore {
    conn: Mutex<Connection>,
}

impl SqliteThreadStore {
    /// Create a new SQLite thread store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, ThreadError> {
        let conn = Connection::open(path).map_err(|e| ThreadError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite thread store (useful for testing).
    pub fn in_memory() -> Result<Self, ThreadError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ThreadError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ThreadError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS threads (
                id TEXT PRIMARY KEY,
                title_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                author TEXT NOT NULL,
                subject TEXT NOT NULL,
                body TEXT NOT NULL,
                view_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_threads_title ON threads(title_id);
            CREATE INDEX IF NOT EXISTS idx_threads_updated ON threads(updated_at);

            -- Replies belong to exactly one thread
            CREATE TABLE IF NOT EXISTS thread_replies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                thread_id TEXT NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
                user_id TEXT NOT NULL,
                author TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_thread_replies_thread ON thread_replies(thread_id);
            "#,
        )
        .map_err(|e| ThreadError::Database(e.to_string()))?;

        Ok(())
    }

    /// Load replies for a thread, oldest first.
    fn load_replies(conn: &Connection, thread_id: &str) -> Result<Vec<Reply>, ThreadError> {
        let mut stmt = conn
            .prepare(
                "SELECT user_id, author, body, created_at FROM thread_replies
                 WHERE thread_id = ? ORDER BY id",
            )
            .map_err(|e| ThreadError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![thread_id], |row| {
                let created_at_str: String = row.get(3)?;
                let created_at = DateTime::parse_from_rfc3339(&created_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now());

                Ok(Reply {
                    user_id: row.get(0)?,
                    author: row.get(1)?,
                    body: row.get(2)?,
                    created_at,
                })
            })
            .map_err(|e| ThreadError::Database(e.to_string()))?;

        let mut replies = Vec::new();
        for row in rows {
            replies.push(row.map_err(|e| ThreadError::Database(e.to_string()))?);
        }
        Ok(replies)
    }

    /// Convert a row to DiscussionThread (without replies).
    fn row_to_thread(row: &rusqlite::Row) -> rusqlite::Result<DiscussionThread> {
        let created_at_str: String = row.get(7)?;
        let updated_at_str: String = row.get(8)?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(DiscussionThread {
            id: row.get(0)?,
            title_id: row.get(1)?,
            user_id: row.get(2)?,
            author: row.get(3)?,
            subject: row.get(4)?,
            body: row.get(5)?,
            view_count: row.get(6)?,
            replies: Vec::new(), // Loaded separately
            created_at,
            updated_at,
        })
    }

    fn get_locked(conn: &Connection, id: &str) -> Result<DiscussionThread, ThreadError> {
        let mut thread = conn
            .query_row(
                "SELECT id, title_id, user_id, author, subject, body, view_count,
                        created_at, updated_at
                 FROM threads WHERE id = ?",
                params![id],
                Self::row_to_thread,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => ThreadError::NotFound(id.to_string()),
                _ => ThreadError::Database(e.to_string()),
            })?;

        thread.replies = Self::load_replies(conn, id)?;
        Ok(thread)
    }

    fn list(
        conn: &Connection,
        where_clause: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<DiscussionThread>, ThreadError> {
        let sql = format!(
            "SELECT id, title_id, user_id, author, subject, body, view_count,
                    created_at, updated_at
             FROM threads {}",
            where_clause
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| ThreadError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params, Self::row_to_thread)
            .map_err(|e| ThreadError::Database(e.to_string()))?;

        let mut threads = Vec::new();
        for row in rows {
            let mut thread = row.map_err(|e| ThreadError::Database(e.to_string()))?;
            thread.replies = Self::load_replies(conn, &thread.id)?;
            threads.push(thread);
        }
        Ok(threads)
    }
}

impl ThreadStore for SqliteThreadStore {
    fn create(
        &self,
        thread: NewThread,
        user_id: &str,
        author: &str,
        now: DateTime<Utc>,
    ) -> Result<DiscussionThread, ThreadError> {
        validate_thread(&thread.subject, &thread.body)?;

        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4().to_string();
        let now_str = now.to_rfc3339();

        conn.execute(
            "INSERT INTO threads (id, title_id, user_id, author, subject, body, view_count,
                                  created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)",
            params![
                &id,
                &thread.title_id,
                user_id,
                author,
                &thread.subject,
                &thread.body,
                &now_str,
                &now_str,
            ],
        )
        .map_err(|e| ThreadError::Database(e.to_string()))?;

        Self::get_locked(&conn, &id)
    }

    fn recent(&self, limit: u32) -> Result<Vec<DiscussionThread>, ThreadError> {
        let conn = self.conn.lock().unwrap();
        Self::list(
            &conn,
            "ORDER BY updated_at DESC LIMIT ?",
            &[&limit],
        )
    }

    fn for_title(&self, title_id: &str, limit: u32) -> Result<Vec<DiscussionThread>, ThreadError> {
        let conn = self.conn.lock().unwrap();
        Self::list(
            &conn,
            "WHERE title_id = ? ORDER BY created_at DESC LIMIT ?",
            &[&title_id, &limit],
        )
    }

    fn get(&self, id: &str) -> Result<DiscussionThread, ThreadError> {
        let conn = self.conn.lock().unwrap();
        Self::get_locked(&conn, id)
    }

    fn increment_views(&self, id: &str) -> Result<u64, ThreadError> {
        let conn = self.conn.lock().unwrap();

        let rows_affected = conn
            .execute(
                "UPDATE threads SET view_count = view_count + 1 WHERE id = ?",
                params![id],
            )
            .map_err(|e| ThreadError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(ThreadError::NotFound(id.to_string()));
        }

        conn.query_row(
            "SELECT view_count FROM threads WHERE id = ?",
            params![id],
            |row| row.get(0),
        )
        .map_err(|e| ThreadError::Database(e.to_string()))
    }

    fn add_reply(
        &self,
        thread_id: &str,
        user_id: &str,
        author: &str,
        body: &str,
        now: DateTime<Utc>,
    ) -> Result<DiscussionThread, ThreadError> {
        validate_reply(body)?;

        let conn = self.conn.lock().unwrap();
        let now_str = now.to_rfc3339();

        // Touch the thread first so a missing id fails before the insert.
        let rows_affected = conn
            .execute(
                "UPDATE threads SET updated_at = ? WHERE id = ?",
                params![&now_str, thread_id],
            )
            .map_err(|e| ThreadError::Database(e.to_string()))?;
        if rows_affected == 0 {
            return Err(ThreadError::NotFound(thread_id.to_string()));
        }

        conn.execute(
            "INSERT INTO thread_replies (thread_id, user_id, author, body, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![thread_id, user_id, author, body, &now_str],
        )
        .map_err(|e| ThreadError::Database(e.to_string()))?;

        Self::get_locked(&conn, thread_id)
    }

    fn delete(&self, id: &str) -> Result<(), ThreadError> {
        let conn = self.conn.lock().unwrap();

        // Replies are not covered by cascade here because foreign keys are
        // off by default in SQLite; delete them explicitly.
        conn.execute(
            "DELETE FROM thread_replies WHERE thread_id = ?",
            params![id],
        )
        .map_err(|e| ThreadError::Database(e.to_string()))?;

        let rows_affected = conn
            .execute("DELETE FROM threads WHERE id = ?", params![id])
            .map_err(|e| ThreadError::Database(e.to_string()))?;

        if rows_affected == 0 {
            return Err(ThreadError::NotFound(id.to_string()));
        }

        Ok(())
    }

    fn count(&self) -> Result<u64, ThreadError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM threads", [], |row| row.get(0))
            .map_err(|e| ThreadError::Database(e.to_string()))
    }
}
