//! SQLite-backed user store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{NewUser, User, UserError, UserStore};

/// SQLite-backed user store.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    /// Create a new SQLite user store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, UserError> {
        let conn = Connection::open(path).map_err(|e| UserError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite user store (useful for testing).
    pub fn in_memory() -> Result<Self, UserError> {
        let conn = Connection::open_in_memory().map_err(|e| UserError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), UserError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL COLLATE NOCASE UNIQUE,
                email TEXT NOT NULL COLLATE NOCASE UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| UserError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let created_at_str: String = row.get(4)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at,
        })
    }
}

impl UserStore for SqliteUserStore {
    fn create(&self, user: NewUser, now: DateTime<Utc>) -> Result<User, UserError> {
        let conn = self.conn.lock().unwrap();
        let id = Uuid::new_v4().to_string();

        conn.execute(
            "INSERT INTO users (id, username, email, password_hash, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                &id,
                &user.username,
                &user.email,
                &user.password_hash,
                &now.to_rfc3339(),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                UserError::AlreadyExists
            }
            _ => UserError::Database(e.to_string()),
        })?;

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
        })
    }

    fn find_by_login(&self, login: &str) -> Result<User, UserError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT id, username, email, password_hash, created_at FROM users
             WHERE username = ? OR email = ?",
            params![login, login],
            Self::row_to_user,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => UserError::NotFound(login.to_string()),
            _ => UserError::Database(e.to_string()),
        })
    }

    fn get(&self, id: &str) -> Result<User, UserError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?",
            params![id],
            Self::row_to_user,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => UserError::NotFound(id.to_string()),
            _ => UserError::Database(e.to_string()),
        })
    }

    fn count(&self) -> Result<u64, UserError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(|e| UserError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteUserStore {
        SqliteUserStore::in_memory().unwrap()
    }

    fn make_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "salt$digest".to_string(),
        }
    }

    #[test]
    fn test_create_and_get() {
        let store = create_test_store();
        let user = store
            .create(make_user("alice", "alice@example.com"), Utc::now())
            .unwrap();

        let fetched = store.get(&user.id).unwrap();
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.email, "alice@example.com");
    }

    #[test]
    fn test_find_by_username_or_email() {
        let store = create_test_store();
        store
            .create(make_user("alice", "alice@example.com"), Utc::now())
            .unwrap();

        assert_eq!(store.find_by_login("alice").unwrap().username, "alice");
        assert_eq!(
            store.find_by_login("alice@example.com").unwrap().username,
            "alice"
        );
    }

    #[test]
    fn test_find_unknown_login() {
        let store = create_test_store();
        let result = store.find_by_login("nobody");
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = create_test_store();
        store
            .create(make_user("alice", "alice@example.com"), Utc::now())
            .unwrap();

        let result = store.create(make_user("alice", "other@example.com"), Utc::now());
        assert!(matches!(result, Err(UserError::AlreadyExists)));
    }

    #[test]
    fn test_duplicate_email_rejected_case_insensitive() {
        let store = create_test_store();
        store
            .create(make_user("alice", "alice@example.com"), Utc::now())
            .unwrap();

        let result = store.create(make_user("bob", "ALICE@example.com"), Utc::now());
        assert!(matches!(result, Err(UserError::AlreadyExists)));
    }

    #[test]
    fn test_count() {
        let store = create_test_store();
        assert_eq!(store.count().unwrap(), 0);
        store
            .create(make_user("alice", "alice@example.com"), Utc::now())
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
