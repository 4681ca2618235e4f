//! Startup seeding of demo content.
//!
//! When enabled and the catalog is empty, inserts demo users, a starter
//! catalog with trend scores, a handful of ratings and two discussion
//! threads. Aggregates always go through the rating maintainer so seeded
//! data obeys the same invariants as live data.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::auth::hash_password;
use crate::catalog::{CatalogStore, NewTitle, TitleStatus};
use crate::discussions::{NewThread, ThreadStore};
use crate::users::{NewUser, UserStore};

struct SeedTitle {
    title: &'static str,
    alt_titles: &'static [&'static str],
    author: &'static str,
    description: &'static str,
    genres: &'static [&'static str],
    kind: &'static str,
    status: TitleStatus,
    chapters: u32,
    publication_year: i32,
    views: u64,
    /// (day, week, month) trend scores.
    trending: (f64, f64, f64),
    /// Days before "now" the title was added.
    added_days_ago: i64,
}

const SEED_TITLES: &[SeedTitle] = &[
    SeedTitle {
        title: "One Piece",
        alt_titles: &["OP"],
        author: "Eiichiro Oda",
        description: "Monkey D. Luffy and his pirate crew explore the Grand Line in search of \
                      the legendary treasure known as One Piece.",
        genres: &["Action", "Adventure", "Fantasy"],
        kind: "Manga",
        status: TitleStatus::Ongoing,
        chapters: 1100,
        publication_year: 1997,
        views: 2_450_000,
        trending: (12.0, 18.0, 25.0),
        added_days_ago: 900,
    },
    SeedTitle {
        title: "Attack on Titan",
        alt_titles: &["Shingeki no Kyojin"],
        author: "Hajime Isayama",
        description: "Humanity lives inside cities surrounded by enormous walls due to the \
                      Titans, gigantic humanoid creatures who devour humans.",
        genres: &["Action", "Dark Fantasy", "Post-Apocalyptic"],
        kind: "Manga",
        status: TitleStatus::Completed,
        chapters: 139,
        publication_year: 2009,
        views: 1_820_000,
        trending: (9.0, 14.0, 21.0),
        added_days_ago: 700,
    },
    SeedTitle {
        title: "My Hero Academia",
        alt_titles: &["Boku no Hero Academia"],
        author: "Kohei Horikoshi",
        description: "In a world where superpowered quirks are the norm, Izuku Midoriya dreams \
                      of becoming a hero despite being born without one.",
        genres: &["Action", "Superhero", "Coming-of-age"],
        kind: "Manga",
        status: TitleStatus::Ongoing,
        chapters: 400,
        publication_year: 2014,
        views: 980_000,
        trending: (7.0, 11.0, 16.0),
        added_days_ago: 500,
    },
    SeedTitle {
        title: "Death Note",
        alt_titles: &[],
        author: "Tsugumi Ohba",
        description: "A high school student discovers a supernatural notebook that kills anyone \
                      whose name is written in it.",
        genres: &["Thriller", "Psychological", "Supernatural"],
        kind: "Manga",
        status: TitleStatus::Completed,
        chapters: 108,
        publication_year: 2003,
        views: 1_240_000,
        trending: (5.0, 8.0, 12.0),
        added_days_ago: 800,
    },
    SeedTitle {
        title: "Demon Slayer",
        alt_titles: &["Kimetsu no Yaiba"],
        author: "Koyoharu Gotouge",
        description: "Tanjiro Kamado becomes a demon slayer after his family is slaughtered and \
                      his younger sister Nezuko is turned into a demon.",
        genres: &["Action", "Dark Fantasy", "Martial Arts"],
        kind: "Manga",
        status: TitleStatus::Completed,
        chapters: 205,
        publication_year: 2016,
        views: 1_560_000,
        trending: (15.0, 22.0, 30.0),
        added_days_ago: 400,
    },
    SeedTitle {
        title: "Solo Leveling",
        alt_titles: &["Na Honjaman Level Up"],
        author: "Chugong",
        description: "In a world of hunters, the weakest of them all gains the unique ability \
                      to level up without limit.",
        genres: &["Action", "Fantasy", "Adventure"],
        kind: "Manhwa",
        status: TitleStatus::Completed,
        chapters: 179,
        publication_year: 2018,
        views: 2_010_000,
        trending: (20.0, 28.0, 35.0),
        added_days_ago: 200,
    },
    SeedTitle {
        title: "Tower of God",
        alt_titles: &["Sin-ui Tap"],
        author: "SIU",
        description: "Twenty-Fifth Bam enters a mysterious tower chasing his only friend, where \
                      each floor holds a deadly test.",
        genres: &["Action", "Fantasy", "Mystery"],
        kind: "Manhwa",
        status: TitleStatus::Ongoing,
        chapters: 550,
        publication_year: 2010,
        views: 760_000,
        trending: (6.0, 9.0, 13.0),
        added_days_ago: 100,
    },
    SeedTitle {
        title: "Berserk",
        alt_titles: &[],
        author: "Kentaro Miura",
        description: "Guts, a lone mercenary branded for death, hunts the demonic forces that \
                      took everything from him.",
        genres: &["Dark Fantasy", "Action", "Horror"],
        kind: "Manga",
        status: TitleStatus::Hiatus,
        chapters: 374,
        publication_year: 1989,
        views: 890_000,
        trending: (4.0, 7.0, 10.0),
        added_days_ago: 50,
    },
];

/// (username, email, password) for demo accounts.
const SEED_USERS: &[(&str, &str, &str)] = &[
    ("admin", "admin@mangaverse.com", "admin123"),
    ("otaku_reader", "otaku@example.com", "password123"),
    ("manga_fan", "fan@example.com", "password123"),
];

/// Per-title rating values, submitted by the demo users in order.
const SEED_RATINGS: &[(&str, &[i64])] = &[
    ("One Piece", &[5, 5, 4]),
    ("Attack on Titan", &[5, 4, 4]),
    ("My Hero Academia", &[4, 3]),
    ("Death Note", &[5, 4]),
    ("Demon Slayer", &[4, 4, 5]),
    ("Solo Leveling", &[5, 5]),
    ("Berserk", &[5]),
];

/// Seed demo content if the catalog is empty.
///
/// Returns `true` if seeding ran. A non-empty catalog is left untouched,
/// so restarting the server never duplicates data.
pub fn seed_if_empty(
    catalog: &dyn CatalogStore,
    users: &dyn UserStore,
    threads: &dyn ThreadStore,
    now: DateTime<Utc>,
) -> Result<bool> {
    if catalog.count().context("Failed to inspect catalog")? > 0 {
        info!("Catalog already populated, skipping seed");
        return Ok(false);
    }

    let mut demo_users = Vec::new();
    for (username, email, password) in SEED_USERS {
        let user = users
            .create(
                NewUser {
                    username: username.to_string(),
                    email: email.to_string(),
                    password_hash: hash_password(password),
                },
                now,
            )
            .with_context(|| format!("Failed to seed user {}", username))?;
        demo_users.push(user);
    }

    let mut title_ids: Vec<(String, String)> = Vec::new();
    for seed in SEED_TITLES {
        let mut trending = BTreeMap::new();
        trending.insert("day".to_string(), seed.trending.0);
        trending.insert("week".to_string(), seed.trending.1);
        trending.insert("month".to_string(), seed.trending.2);

        let record = catalog
            .insert(
                NewTitle {
                    title: seed.title.to_string(),
                    alt_titles: seed.alt_titles.iter().map(|s| s.to_string()).collect(),
                    author: seed.author.to_string(),
                    description: seed.description.to_string(),
                    cover_image: None,
                    genres: seed.genres.iter().map(|s| s.to_string()).collect(),
                    kind: seed.kind.to_string(),
                    status: seed.status,
                    chapters: seed.chapters,
                    publication_year: Some(seed.publication_year),
                    view_count: seed.views,
                    trending,
                },
                now - Duration::days(seed.added_days_ago),
            )
            .with_context(|| format!("Failed to seed title {}", seed.title))?;
        title_ids.push((record.title.clone(), record.id));
    }

    for (title_name, values) in SEED_RATINGS {
        let Some((_, title_id)) = title_ids.iter().find(|(name, _)| name == title_name) else {
            continue;
        };
        for (user, value) in demo_users.iter().zip(values.iter()) {
            catalog
                .submit_rating(title_id, &user.id, *value, now)
                .with_context(|| format!("Failed to seed rating for {}", title_name))?;
        }
    }

    let (_, one_piece_id) = &title_ids[0];
    let admin = &demo_users[0];
    let reader = &demo_users[1];

    let thread = threads
        .create(
            NewThread {
                title_id: one_piece_id.clone(),
                subject: "Welcome to the community".to_string(),
                body: "Introduce yourself and share what you are reading.".to_string(),
            },
            &admin.id,
            &admin.username,
            now,
        )
        .context("Failed to seed welcome thread")?;
    threads
        .add_reply(
            &thread.id,
            &reader.id,
            &reader.username,
            "Currently catching up on the latest arc!",
            now,
        )
        .context("Failed to seed welcome reply")?;

    threads
        .create(
            NewThread {
                title_id: one_piece_id.clone(),
                subject: "Favorite arc so far?".to_string(),
                body: "Hard to pick one, but the current arc is a strong contender.".to_string(),
            },
            &reader.id,
            &reader.username,
            now,
        )
        .context("Failed to seed discussion thread")?;

    info!(
        "Seeded {} titles, {} users and {} threads",
        title_ids.len(),
        demo_users.len(),
        threads.count().unwrap_or(0)
    );
    Ok(true)
}
