//! Rating aggregate maintenance.
//!
//! Applies one rating submission to a title's existing entries and
//! recomputes the stored aggregate. The computation is pure; persisting
//! the result (entry upsert plus aggregate update, under one lock) is the
//! catalog store's job.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::RatingEntry;

/// Lowest accepted rating value.
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating value.
pub const MAX_RATING: i64 = 5;

/// Errors for rating submissions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    #[error("Invalid rating value: {0} (must be an integer from 1 to 5)")]
    InvalidRating(i64),
}

/// The result of applying one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingUpdate {
    /// Arithmetic mean of all entries after the upsert.
    pub average_rating: f64,
    /// Number of entries after the upsert.
    pub rating_count: u32,
    /// The entry that was inserted or replaced.
    pub entry: RatingEntry,
}

/// Apply a `(user, value)` submission to a title's existing entries.
///
/// A prior entry by the same user is replaced, never duplicated, and the
/// returned aggregate reflects exactly the post-upsert set. Values
/// outside [`MIN_RATING`]..=[`MAX_RATING`] are rejected without touching
/// anything.
pub fn apply_rating(
    existing: &[RatingEntry],
    title_id: &str,
    user_id: &str,
    value: i64,
    now: DateTime<Utc>,
) -> Result<RatingUpdate, RatingError> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(RatingError::InvalidRating(value));
    }
    let value = value as u8;

    let mut values: Vec<u8> = existing
        .iter()
        .filter(|e| e.user_id != user_id)
        .map(|e| e.value)
        .collect();
    values.push(value);

    let sum: u32 = values.iter().map(|v| u32::from(*v)).sum();
    let rating_count = values.len() as u32;
    let average_rating = f64::from(sum) / f64::from(rating_count);

    Ok(RatingUpdate {
        average_rating,
        rating_count,
        entry: RatingEntry {
            title_id: title_id.to_string(),
            user_id: user_id.to_string(),
            value,
            rated_at: now,
        },
    })
}
