pub mod auth;
pub mod catalog;
pub mod config;
pub mod discussions;
pub mod ranking;
pub mod seed;
pub mod users;

pub use auth::{
    cookie_value, hash_password, verify_password, AuthError, AuthRequest, Authenticator, Identity,
    SessionAuthenticator, SessionStore,
};
pub use catalog::{
    CatalogError, CatalogSort, CatalogStore, NewTitle, RatingEntry, SqliteCatalog, TitleQuery,
    TitleRecord, TitleStatus,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    SanitizedConfig, SeedConfig, ServerConfig, SessionConfig,
};
pub use discussions::{
    DiscussionThread, NewThread, Reply, SqliteThreadStore, ThreadError, ThreadStore,
};
pub use ranking::{
    apply_rating, format_rating, format_views, search, top_rated, trending, Medal, PodiumEntry,
    RankedEntry, RatingError, RatingUpdate, SearchHit, SearchOutcome, SortMode, TitleFilter,
    TopRatedPage, TrendingEntry, MAX_RATING, MIN_RATING, RANKED_LIST_LEN, TRENDING_LIMIT,
};
pub use seed::seed_if_empty;
pub use users::{NewUser, SqliteUserStore, User, UserError, UserStore};
