//! Full-text search over title snapshots.
//!
//! Matching is a case-insensitive substring test against a haystack built
//! from every searchable field of a title. Matches are ranked by a field
//! relevance score, ties broken by average rating, remaining ties keep
//! encounter order.

use crate::catalog::TitleRecord;

/// Separator between haystack fields (EN SPACE, visible in debug output).
const FIELD_SEPARATOR: &str = " \u{2002} ";

/// A matched title with its relevance score.
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    /// Relevance score, higher wins.
    pub score: u32,
    pub title: &'a TitleRecord,
}

/// Result of a search request.
///
/// An absent query is a distinct outcome from a query that matched
/// nothing, so callers can message the two cases differently.
#[derive(Debug)]
pub enum SearchOutcome<'a> {
    /// No query string was supplied (empty or whitespace-only).
    NoQuery,
    /// The query ran; the hit list may be empty.
    Ranked(Vec<SearchHit<'a>>),
}

/// Search `titles` for `query`.
///
/// Returns hits ordered by descending relevance score, ties broken by
/// descending average rating. The sort is stable, so titles that tie on
/// both keys keep their input order.
pub fn search<'a>(query: &str, titles: &'a [TitleRecord]) -> SearchOutcome<'a> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return SearchOutcome::NoQuery;
    }

    let mut hits: Vec<SearchHit<'a>> = titles
        .iter()
        .filter(|t| haystack(t).contains(&q))
        .map(|t| SearchHit {
            score: relevance(t, &q),
            title: t,
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score.cmp(&a.score).then_with(|| {
            b.title
                .average_rating
                .total_cmp(&a.title.average_rating)
        })
    });

    SearchOutcome::Ranked(hits)
}

/// Build the lowercased haystack for a title.
///
/// Concatenates title, alternate titles, author, type tag, status and
/// genres. Empty fields are skipped so the separator never doubles up.
pub fn haystack(title: &TitleRecord) -> String {
    let mut fields: Vec<&str> = Vec::new();
    fields.push(&title.title);
    fields.extend(title.alt_titles.iter().map(String::as_str));
    fields.push(&title.author);
    fields.push(&title.kind);
    fields.push(title.status.as_str());
    fields.extend(title.genres.iter().map(String::as_str));

    fields
        .into_iter()
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
        .to_lowercase()
}

/// Score a matching title against the lowercased query.
fn relevance(title: &TitleRecord, q: &str) -> u32 {
    let t = title.title.to_lowercase();
    if t == q {
        return 100;
    }
    if t.starts_with(q) {
        return 80;
    }
    if t.contains(q) {
        return 60;
    }
    if title
        .alt_titles
        .iter()
        .any(|alt| alt.to_lowercase().contains(q))
    {
        return 50;
    }
    // Matched via author, type, status or genres only.
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TitleStatus;

    fn make_title(name: &str, rating: f64) -> TitleRecord {
        TitleRecord {
            title: name.to_string(),
            average_rating: rating,
            ..TitleRecord::test_default()
        }
    }

    #[test]
    fn test_empty_query_is_no_query() {
        let titles = vec![make_title("One Piece", 4.5)];
        assert!(matches!(search("", &titles), SearchOutcome::NoQuery));
        assert!(matches!(search("   ", &titles), SearchOutcome::NoQuery));
    }

    #[test]
    fn test_zero_matches_is_ranked_empty() {
        let titles = vec![make_title("One Piece", 4.5)];
        match search("zzzz", &titles) {
            SearchOutcome::Ranked(hits) => assert!(hits.is_empty()),
            SearchOutcome::NoQuery => panic!("expected a ranked outcome"),
        }
    }

    #[test]
    fn test_results_are_subsequence_of_input() {
        let titles = vec![
            make_title("One Piece", 4.5),
            make_title("Berserk", 4.8),
            make_title("One Punch Man", 4.2),
        ];
        let SearchOutcome::Ranked(hits) = search("one", &titles) else {
            panic!("expected a ranked outcome");
        };
        // No invented records, and every hit's haystack contains the query.
        for hit in &hits {
            assert!(titles.iter().any(|t| std::ptr::eq(t, hit.title)));
            assert!(haystack(hit.title).contains("one"));
        }
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_exact_match_outranks_prefix() {
        let titles = vec![
            make_title("Naruto Shippuden", 4.9),
            make_title("Naruto", 4.1),
        ];
        let SearchOutcome::Ranked(hits) = search("naruto", &titles) else {
            panic!("expected a ranked outcome");
        };
        assert_eq!(hits[0].title.title, "Naruto");
        assert_eq!(hits[0].score, 100);
        assert_eq!(hits[1].score, 80);
    }

    #[test]
    fn test_title_substring_scores_60() {
        let titles = vec![make_title("The One Piece", 4.0)];
        let SearchOutcome::Ranked(hits) = search("one", &titles) else {
            panic!("expected a ranked outcome");
        };
        assert_eq!(hits[0].score, 60);
    }

    #[test]
    fn test_alt_title_scores_50() {
        let mut title = make_title("Shingeki no Kyojin", 4.7);
        title.alt_titles = vec!["Attack on Titan".to_string()];
        let titles = vec![title];
        let SearchOutcome::Ranked(hits) = search("attack", &titles) else {
            panic!("expected a ranked outcome");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 50);
    }

    #[test]
    fn test_metadata_match_scores_30() {
        let mut title = make_title("Berserk", 4.9);
        title.author = "Kentaro Miura".to_string();
        title.genres = vec!["Dark Fantasy".to_string()];
        let titles = vec![title];

        let SearchOutcome::Ranked(by_author) = search("miura", &titles) else {
            panic!("expected a ranked outcome");
        };
        assert_eq!(by_author[0].score, 30);

        let SearchOutcome::Ranked(by_genre) = search("dark fantasy", &titles) else {
            panic!("expected a ranked outcome");
        };
        assert_eq!(by_genre[0].score, 30);
    }

    #[test]
    fn test_tie_broken_by_average_rating() {
        let titles = vec![
            make_title("One Punch Man", 4.2),
            make_title("One Piece", 4.8),
        ];
        let SearchOutcome::Ranked(hits) = search("one p", &titles) else {
            panic!("expected a ranked outcome");
        };
        // Both score 80, higher rating first.
        assert_eq!(hits[0].title.title, "One Piece");
        assert_eq!(hits[1].title.title, "One Punch Man");
    }

    #[test]
    fn test_full_tie_keeps_encounter_order() {
        let titles = vec![
            make_title("The One Piece", 4.5),
            make_title("The One-Shot", 4.5),
        ];
        let SearchOutcome::Ranked(hits) = search("one", &titles) else {
            panic!("expected a ranked outcome");
        };
        // Both score 60 and tie on rating, so input order is preserved.
        assert_eq!(hits[0].title.title, "The One Piece");
        assert_eq!(hits[1].title.title, "The One-Shot");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let titles = vec![make_title("DEATH NOTE", 4.4)];
        let SearchOutcome::Ranked(hits) = search("death note", &titles) else {
            panic!("expected a ranked outcome");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 100);
    }

    #[test]
    fn test_status_is_searchable() {
        let mut title = make_title("Vagabond", 4.6);
        title.status = TitleStatus::Hiatus;
        let titles = vec![title];
        let SearchOutcome::Ranked(hits) = search("hiatus", &titles) else {
            panic!("expected a ranked outcome");
        };
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 30);
    }

    #[test]
    fn test_missing_optional_fields_do_not_match_everything() {
        // A record with empty author/genres must not match arbitrary queries.
        let titles = vec![make_title("Bleach", 4.0)];
        let SearchOutcome::Ranked(hits) = search("ongoing!", &titles) else {
            panic!("expected a ranked outcome");
        };
        assert!(hits.is_empty());
    }
}
