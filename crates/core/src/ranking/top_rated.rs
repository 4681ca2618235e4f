//! Top-rated ranking: a three-slot podium plus a ranked list.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{TitleRecord, TitleStatus};

/// Length of the ranked list below the podium (ranks 4..=13).
pub const RANKED_LIST_LEN: usize = 10;

/// Filter applied before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TitleFilter {
    #[default]
    All,
    Manga,
    Manhwa,
    Completed,
    LastYear,
}

impl TitleFilter {
    fn keeps(&self, title: &TitleRecord, now: DateTime<Utc>) -> bool {
        match self {
            TitleFilter::All => true,
            TitleFilter::Manga => title.kind.eq_ignore_ascii_case("manga"),
            TitleFilter::Manhwa => title.kind.eq_ignore_ascii_case("manhwa"),
            TitleFilter::Completed => title.status == TitleStatus::Completed,
            // Inclusive boundary: a title added exactly one year ago is kept.
            TitleFilter::LastYear => match (title.added_at, now.checked_sub_months(Months::new(12)))
            {
                (Some(added), Some(cutoff)) => added >= cutoff,
                _ => false,
            },
        }
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Average rating, ties broken by review count.
    #[default]
    Rating,
    /// Review count only.
    Reviews,
    /// Addition timestamp, newest first; missing timestamps sort last.
    Recent,
}

/// Medal tier, derived from true rank only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    fn for_rank(rank: u32) -> Self {
        match rank {
            1 => Medal::Gold,
            2 => Medal::Silver,
            _ => Medal::Bronze,
        }
    }
}

/// A podium slot, carrying the title's true rank.
#[derive(Debug, Clone)]
pub struct PodiumEntry<'a> {
    pub rank: u32,
    pub medal: Medal,
    pub title: &'a TitleRecord,
}

/// A ranked-list entry below the podium.
#[derive(Debug, Clone)]
pub struct RankedEntry<'a> {
    pub rank: u32,
    pub title: &'a TitleRecord,
}

/// A complete top-rated page.
#[derive(Debug, Clone)]
pub struct TopRatedPage<'a> {
    /// Up to three entries in display order: second, first, third.
    pub podium: Vec<PodiumEntry<'a>>,
    /// Entries ranked 4..=13.
    pub ranked: Vec<RankedEntry<'a>>,
}

/// Filter and rank `titles`, producing the podium and the ranked list.
pub fn top_rated<'a>(
    filter: TitleFilter,
    sort: SortMode,
    now: DateTime<Utc>,
    titles: &'a [TitleRecord],
) -> TopRatedPage<'a> {
    let mut kept: Vec<&TitleRecord> = titles.iter().filter(|t| filter.keeps(t, now)).collect();

    match sort {
        SortMode::Rating => kept.sort_by(|a, b| {
            b.average_rating
                .total_cmp(&a.average_rating)
                .then_with(|| b.rating_count.cmp(&a.rating_count))
        }),
        SortMode::Reviews => kept.sort_by(|a, b| b.rating_count.cmp(&a.rating_count)),
        SortMode::Recent => kept.sort_by_key(|t| {
            std::cmp::Reverse(t.added_at.map(|d| d.timestamp_millis()).unwrap_or(0))
        }),
    }

    // Center-weighted display order: second place, first place, third place.
    // With fewer than three survivors the relative ordering of the present
    // slots is preserved.
    let mut podium = Vec::with_capacity(3);
    if kept.len() >= 2 {
        podium.push(podium_entry(2, kept[1]));
    }
    if !kept.is_empty() {
        podium.push(podium_entry(1, kept[0]));
    }
    if kept.len() >= 3 {
        podium.push(podium_entry(3, kept[2]));
    }

    let ranked = kept
        .iter()
        .skip(3)
        .take(RANKED_LIST_LEN)
        .enumerate()
        .map(|(idx, title)| RankedEntry {
            rank: idx as u32 + 4,
            title,
        })
        .collect();

    TopRatedPage { podium, ranked }
}

fn podium_entry(rank: u32, title: &TitleRecord) -> PodiumEntry<'_> {
    PodiumEntry {
        rank,
        medal: Medal::for_rank(rank),
        title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_title(name: &str, rating: f64, reviews: u32) -> TitleRecord {
        let mut title = TitleRecord::test_default();
        title.title = name.to_string();
        title.average_rating = rating;
        title.rating_count = reviews;
        title
    }

    fn now() -> DateTime<Utc> {
        "2026-08-05T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_podium_display_order_and_medals() {
        let titles = vec![
            make_title("R1", 4.9, 10),
            make_title("R2", 4.8, 10),
            make_title("R3", 4.7, 10),
        ];
        let page = top_rated(TitleFilter::All, SortMode::Rating, now(), &titles);

        let names: Vec<&str> = page.podium.iter().map(|p| p.title.title.as_str()).collect();
        assert_eq!(names, vec!["R2", "R1", "R3"]);
        let ranks: Vec<u32> = page.podium.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![2, 1, 3]);
        let medals: Vec<Medal> = page.podium.iter().map(|p| p.medal).collect();
        assert_eq!(medals, vec![Medal::Silver, Medal::Gold, Medal::Bronze]);
    }

    #[test]
    fn test_podium_with_two_survivors() {
        let titles = vec![make_title("A", 4.9, 1), make_title("B", 4.1, 1)];
        let page = top_rated(TitleFilter::All, SortMode::Rating, now(), &titles);

        let ranks: Vec<u32> = page.podium.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![2, 1]);
        assert_eq!(page.podium[0].title.title, "B");
        assert_eq!(page.podium[1].title.title, "A");
        assert!(page.ranked.is_empty());
    }

    #[test]
    fn test_podium_with_one_survivor() {
        let titles = vec![make_title("Only", 3.0, 1)];
        let page = top_rated(TitleFilter::All, SortMode::Rating, now(), &titles);
        assert_eq!(page.podium.len(), 1);
        assert_eq!(page.podium[0].rank, 1);
        assert_eq!(page.podium[0].medal, Medal::Gold);
    }

    #[test]
    fn test_podium_empty_input() {
        let page = top_rated(TitleFilter::All, SortMode::Rating, now(), &[]);
        assert!(page.podium.is_empty());
        assert!(page.ranked.is_empty());
    }

    #[test]
    fn test_ranked_list_positions() {
        let titles: Vec<TitleRecord> = (0..20)
            .map(|i| make_title(&format!("T{}", i), 5.0 - i as f64 * 0.1, 1))
            .collect();
        let page = top_rated(TitleFilter::All, SortMode::Rating, now(), &titles);

        assert_eq!(page.ranked.len(), RANKED_LIST_LEN);
        assert_eq!(page.ranked[0].rank, 4);
        assert_eq!(page.ranked[0].title.title, "T3");
        assert_eq!(page.ranked[9].rank, 13);
        assert_eq!(page.ranked[9].title.title, "T12");
    }

    #[test]
    fn test_rating_sort_ties_on_review_count() {
        let titles = vec![
            make_title("Few", 4.5, 10),
            make_title("Many", 4.5, 500),
        ];
        let page = top_rated(TitleFilter::All, SortMode::Rating, now(), &titles);
        assert_eq!(page.podium[1].title.title, "Many");
    }

    #[test]
    fn test_reviews_sort() {
        let titles = vec![
            make_title("Loved", 4.9, 10),
            make_title("Popular", 3.9, 900),
        ];
        let page = top_rated(TitleFilter::All, SortMode::Reviews, now(), &titles);
        assert_eq!(page.podium[1].title.title, "Popular");
    }

    #[test]
    fn test_recent_sort_missing_timestamp_sorts_last() {
        let mut old = make_title("Old", 4.0, 1);
        old.added_at = Some(now() - Duration::days(300));
        let mut new = make_title("New", 4.0, 1);
        new.added_at = Some(now() - Duration::days(3));
        let mut undated = make_title("Undated", 4.0, 1);
        undated.added_at = None;

        let titles = vec![undated, old, new];
        let page = top_rated(TitleFilter::All, SortMode::Recent, now(), &titles);
        assert_eq!(page.podium[1].title.title, "New");
        assert_eq!(page.podium[0].title.title, "Old");
        assert_eq!(page.podium[2].title.title, "Undated");
    }

    #[test]
    fn test_kind_filters_are_case_insensitive() {
        let mut manga = make_title("A Manga", 4.0, 1);
        manga.kind = "Manga".to_string();
        let mut manhwa = make_title("A Manhwa", 4.0, 1);
        manhwa.kind = "MANHWA".to_string();
        let titles = vec![manga, manhwa];

        let page = top_rated(TitleFilter::Manga, SortMode::Rating, now(), &titles);
        assert_eq!(page.podium.len(), 1);
        assert_eq!(page.podium[0].title.title, "A Manga");

        let page = top_rated(TitleFilter::Manhwa, SortMode::Rating, now(), &titles);
        assert_eq!(page.podium.len(), 1);
        assert_eq!(page.podium[0].title.title, "A Manhwa");
    }

    #[test]
    fn test_completed_filter() {
        let mut done = make_title("Done", 4.0, 1);
        done.status = TitleStatus::Completed;
        let running = make_title("Running", 4.5, 1);
        let titles = vec![done, running];

        let page = top_rated(TitleFilter::Completed, SortMode::Rating, now(), &titles);
        assert_eq!(page.podium.len(), 1);
        assert_eq!(page.podium[0].title.title, "Done");
    }

    #[test]
    fn test_last_year_boundary_is_inclusive() {
        let exactly_one_year = now().checked_sub_months(Months::new(12)).unwrap();

        let mut boundary = make_title("Boundary", 4.0, 1);
        boundary.added_at = Some(exactly_one_year);
        let mut older = make_title("Older", 4.0, 1);
        older.added_at = Some(exactly_one_year - Duration::seconds(1));
        let mut undated = make_title("Undated", 4.0, 1);
        undated.added_at = None;

        let titles = vec![boundary, older, undated];
        let page = top_rated(TitleFilter::LastYear, SortMode::Rating, now(), &titles);
        assert_eq!(page.podium.len(), 1);
        assert_eq!(page.podium[0].title.title, "Boundary");
    }

    #[test]
    fn test_filter_deserialization() {
        let filter: TitleFilter = serde_json::from_str("\"last-year\"").unwrap();
        assert_eq!(filter, TitleFilter::LastYear);
        let sort: SortMode = serde_json::from_str("\"reviews\"").unwrap();
        assert_eq!(sort, SortMode::Reviews);
    }
}
