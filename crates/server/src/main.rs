use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mangaverse_core::{
    load_config, seed_if_empty, validate_config, Authenticator, CatalogStore, SessionAuthenticator,
    SessionStore, SqliteCatalog, SqliteThreadStore, SqliteUserStore, ThreadStore, UserStore,
};

use mangaverse_server::api::create_router;
use mangaverse_server::state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MANGAVERSE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);

    // Create SQLite stores (one database file, one store per concern)
    let catalog: Arc<dyn CatalogStore> = Arc::new(
        SqliteCatalog::new(&config.database.path).context("Failed to create title catalog")?,
    );
    info!("Title catalog initialized");

    let threads: Arc<dyn ThreadStore> = Arc::new(
        SqliteThreadStore::new(&config.database.path).context("Failed to create thread store")?,
    );
    info!("Thread store initialized");

    let users: Arc<dyn UserStore> = Arc::new(
        SqliteUserStore::new(&config.database.path).context("Failed to create user store")?,
    );
    info!("User store initialized");

    // Seed demo content on first start
    if config.seed.enabled {
        let seeded = seed_if_empty(
            catalog.as_ref(),
            users.as_ref(),
            threads.as_ref(),
            Utc::now(),
        )
        .context("Seeding failed")?;
        if seeded {
            info!("Seeded demo content into an empty catalog");
        }
    } else {
        info!("Seeding disabled in config");
    }

    // Create session store and authenticator
    let sessions = Arc::new(SessionStore::new(config.session.ttl_minutes));
    let authenticator: Arc<dyn Authenticator> = Arc::new(SessionAuthenticator::new(
        Arc::clone(&sessions),
        config.session.cookie_name.clone(),
    ));
    info!("Using authenticator: {}", authenticator.method_name());

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        catalog,
        threads,
        users,
        sessions,
        authenticator,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
