use std::sync::Arc;

use mangaverse_core::{
    Authenticator, CatalogStore, Config, SanitizedConfig, SessionStore, ThreadStore, UserStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<dyn CatalogStore>,
    threads: Arc<dyn ThreadStore>,
    users: Arc<dyn UserStore>,
    sessions: Arc<SessionStore>,
    authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<dyn CatalogStore>,
        threads: Arc<dyn ThreadStore>,
        users: Arc<dyn UserStore>,
        sessions: Arc<SessionStore>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            config,
            catalog,
            threads,
            users,
            sessions,
            authenticator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }

    pub fn session_ttl_minutes(&self) -> u64 {
        self.config.session.ttl_minutes
    }

    pub fn catalog(&self) -> &dyn CatalogStore {
        self.catalog.as_ref()
    }

    pub fn threads(&self) -> &dyn ThreadStore {
        self.threads.as_ref()
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub fn sessions(&self) -> &SessionStore {
        self.sessions.as_ref()
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }
}
