//! Types for discussion threads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a thread subject.
pub const MAX_SUBJECT_LEN: usize = 200;
/// Maximum length of a thread body.
pub const MAX_BODY_LEN: usize = 5_000;
/// Maximum length of a reply body.
pub const MAX_REPLY_LEN: usize = 2_000;

/// A discussion thread about one title.
///
/// The author's username is denormalized onto the row at creation so
/// listings need no join against the user store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionThread {
    pub id: String,
    pub title_id: String,
    pub user_id: String,
    pub author: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(default, rename = "views")]
    pub view_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A reply within a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub user_id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A new thread request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThread {
    pub title_id: String,
    pub subject: String,
    pub body: String,
}

/// Errors for thread operations.
#[derive(Debug, Error)]
pub enum ThreadError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Thread not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Validate a subject/body pair for a new thread.
pub(crate) fn validate_thread(subject: &str, body: &str) -> Result<(), ThreadError> {
    if subject.trim().is_empty() || body.trim().is_empty() {
        return Err(ThreadError::InvalidInput(
            "Subject and body are required".to_string(),
        ));
    }
    if subject.len() > MAX_SUBJECT_LEN {
        return Err(ThreadError::InvalidInput(format!(
            "Subject exceeds {} characters",
            MAX_SUBJECT_LEN
        )));
    }
    if body.len() > MAX_BODY_LEN {
        return Err(ThreadError::InvalidInput(format!(
            "Body exceeds {} characters",
            MAX_BODY_LEN
        )));
    }
    Ok(())
}

/// Validate a reply body.
pub(crate) fn validate_reply(body: &str) -> Result<(), ThreadError> {
    if body.trim().is_empty() {
        return Err(ThreadError::InvalidInput(
            "Reply content is required".to_string(),
        ));
    }
    if body.len() > MAX_REPLY_LEN {
        return Err(ThreadError::InvalidInput(format!(
            "Reply exceeds {} characters",
            MAX_REPLY_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_thread_ok() {
        assert!(validate_thread("Subject", "Body").is_ok());
    }

    #[test]
    fn test_validate_thread_empty_fields() {
        assert!(validate_thread("", "Body").is_err());
        assert!(validate_thread("Subject", "   ").is_err());
    }

    #[test]
    fn test_validate_thread_length_limits() {
        assert!(validate_thread(&"x".repeat(MAX_SUBJECT_LEN), "Body").is_ok());
        assert!(validate_thread(&"x".repeat(MAX_SUBJECT_LEN + 1), "Body").is_err());
        assert!(validate_thread("Subject", &"x".repeat(MAX_BODY_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_reply_limits() {
        assert!(validate_reply("Nice chapter").is_ok());
        assert!(validate_reply("").is_err());
        assert!(validate_reply(&"x".repeat(MAX_REPLY_LEN + 1)).is_err());
    }

    #[test]
    fn test_thread_json_field_names() {
        let thread = DiscussionThread {
            id: "t1".to_string(),
            title_id: "m1".to_string(),
            user_id: "u1".to_string(),
            author: "alice".to_string(),
            subject: "Best arc?".to_string(),
            body: "Discuss.".to_string(),
            replies: Vec::new(),
            view_count: 7,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&thread).unwrap();
        assert_eq!(json["views"], 7);
        assert_eq!(json["titleId"], "m1");
        assert_eq!(json["author"], "alice");
    }
}
