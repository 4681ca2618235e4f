use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::{auth, discussions, handlers, middleware as mw, rankings, titles};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Static assets path (configurable via env)
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string());

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Home page data
        .route("/home", get(handlers::home))
        // Titles
        .route("/titles", get(titles::list_titles))
        .route("/titles/{id}", get(titles::get_title))
        .route("/titles/{id}/rate", post(titles::rate_title))
        // Ranked views
        .route("/search", get(rankings::search_titles))
        .route("/trending", get(rankings::trending_titles))
        .route("/top-rated", get(rankings::top_rated_titles))
        // Discussions
        .route("/discussions", get(discussions::list_threads))
        .route("/discussions", post(discussions::create_thread))
        .route("/discussions/{id}", get(discussions::get_thread))
        .route("/discussions/{id}", delete(discussions::delete_thread))
        .route("/discussions/{id}/replies", post(discussions::add_reply))
        // Session accounts
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            mw::identity_middleware,
        ))
        .with_state(state);

    // Serve static assets for everything outside the API
    let serve_dir = ServeDir::new(&static_dir);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(mw::metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
