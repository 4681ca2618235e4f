//! Trending ranking for a given period.

use crate::catalog::TitleRecord;

/// Number of entries a trending page shows.
pub const TRENDING_LIMIT: usize = 6;

/// Ranks 1 through this value get podium-style rendering.
const PODIUM_RANKS: u32 = 3;

/// One entry in a trending ranking.
#[derive(Debug, Clone)]
pub struct TrendingEntry<'a> {
    /// 1-based position, assigned after truncation.
    pub rank: u32,
    /// True for ranks 1-3.
    pub podium: bool,
    /// The title's trend score for the requested period.
    pub trend_score: f64,
    pub title: &'a TitleRecord,
}

/// Rank titles by trend score for `period`.
///
/// Titles without a trend score for the period are excluded, not treated
/// as zero. Ties are broken by view count. At most [`TRENDING_LIMIT`]
/// entries are returned.
pub fn trending<'a>(period: &str, titles: &'a [TitleRecord]) -> Vec<TrendingEntry<'a>> {
    let mut scored: Vec<(f64, &TitleRecord)> = titles
        .iter()
        .filter_map(|t| t.trending.get(period).map(|score| (*score, t)))
        .collect();

    scored.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| b.1.view_count.cmp(&a.1.view_count))
    });
    scored.truncate(TRENDING_LIMIT);

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (trend_score, title))| {
            let rank = idx as u32 + 1;
            TrendingEntry {
                rank,
                podium: rank <= PODIUM_RANKS,
                trend_score,
                title,
            }
        })
        .collect()
}
