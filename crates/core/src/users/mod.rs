//! User accounts.

mod sqlite;
mod types;

pub use sqlite::SqliteUserStore;
pub use types::*;

use chrono::{DateTime, Utc};

/// Trait for user account storage.
pub trait UserStore: Send + Sync {
    /// Create a new account. Username and email must be unique
    /// (case-insensitive).
    fn create(&self, user: NewUser, now: DateTime<Utc>) -> Result<User, UserError>;

    /// Find an account by username or email (either matches).
    fn find_by_login(&self, login: &str) -> Result<User, UserError>;

    /// Fetch an account by id.
    fn get(&self, id: &str) -> Result<User, UserError>;

    /// Number of accounts.
    fn count(&self) -> Result<u64, UserError>;
}
