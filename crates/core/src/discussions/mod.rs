//! Discussion threads and replies.

mod sqlite;
mod types;

pub use sqlite::SqliteThreadStore;
pub use types::*;

use chrono::{DateTime, Utc};

/// Trait for discussion thread storage.
pub trait ThreadStore: Send + Sync {
    /// Create a thread. Subject and body are validated for length.
    fn create(
        &self,
        thread: NewThread,
        user_id: &str,
        author: &str,
        now: DateTime<Utc>,
    ) -> Result<DiscussionThread, ThreadError>;

    /// Most recently updated threads, newest first.
    fn recent(&self, limit: u32) -> Result<Vec<DiscussionThread>, ThreadError>;

    /// Newest threads for one title.
    fn for_title(&self, title_id: &str, limit: u32) -> Result<Vec<DiscussionThread>, ThreadError>;

    /// Fetch a thread with its replies.
    fn get(&self, id: &str) -> Result<DiscussionThread, ThreadError>;

    /// Increment a thread's view counter, returning the new count.
    fn increment_views(&self, id: &str) -> Result<u64, ThreadError>;

    /// Append a reply, touching the thread's updated timestamp.
    fn add_reply(
        &self,
        thread_id: &str,
        user_id: &str,
        author: &str,
        body: &str,
        now: DateTime<Utc>,
    ) -> Result<DiscussionThread, ThreadError>;

    /// Delete a thread and its replies. Ownership is the caller's check.
    fn delete(&self, id: &str) -> Result<(), ThreadError>;

    /// Number of threads.
    fn count(&self) -> Result<u64, ThreadError>;
}
