//! Display formatting helpers for counters and ratings.

/// Format a view count for display.
///
/// Below 1,000 the plain number is returned. From 1,000 the count is
/// scaled to `K` (and from 1,000,000 to `M`) with one decimal place,
/// rounded half-up, and a trailing `.0` stripped.
pub fn format_views(views: u64) -> String {
    if views >= 1_000_000 {
        scaled(views, 1_000_000, "M")
    } else if views >= 1_000 {
        scaled(views, 1_000, "K")
    } else {
        views.to_string()
    }
}

fn scaled(n: u64, divisor: u64, suffix: &str) -> String {
    // Tenths of the scaled value, rounded half-up.
    let tenths = (n * 10 + divisor / 2) / divisor;
    if tenths % 10 == 0 {
        format!("{}{}", tenths / 10, suffix)
    } else {
        format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
    }
}

/// Format an average rating with exactly one decimal digit.
pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", rating)
}
