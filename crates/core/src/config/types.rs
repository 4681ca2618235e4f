use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("mangaverse.db")
}

/// Session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session lifetime in minutes.
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_minutes: default_ttl_minutes(),
        }
    }
}

fn default_cookie_name() -> String {
    "mangaverse_session".to_string()
}

fn default_ttl_minutes() -> u64 {
    24 * 60
}

/// Startup seeding configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedConfig {
    /// Seed demo content when the catalog is empty.
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
        }
    }
}

fn default_seed_enabled() -> bool {
    true
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SanitizedSessionConfig,
    pub seed: SeedConfig,
}

/// Session config without anything cookie-forgeable (only shape is shown)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSessionConfig {
    pub cookie_name: String,
    pub ttl_minutes: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            database: config.database.clone(),
            session: SanitizedSessionConfig {
                cookie_name: config.session.cookie_name.clone(),
                ttl_minutes: config.session.ttl_minutes,
            },
            seed: config.seed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
path = "/data/catalog.db"

[session]
cookie_name = "sid"
ttl_minutes = 60

[seed]
enabled = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.database.path.to_str().unwrap(), "/data/catalog.db");
        assert_eq!(config.session.cookie_name, "sid");
        assert_eq!(config.session.ttl_minutes, 60);
        assert!(!config.seed.enabled);
    }

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "mangaverse.db");
        assert_eq!(config.session.cookie_name, "mangaverse_session");
        assert_eq!(config.session.ttl_minutes, 1440);
        assert!(config.seed.enabled);
    }

    #[test]
    fn test_partial_section_fills_remaining_defaults() {
        let toml = r#"
[session]
ttl_minutes = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.session.ttl_minutes, 5);
        assert_eq!(config.session.cookie_name, "mangaverse_session");
    }

    #[test]
    fn test_sanitized_config() {
        let config = Config::default();
        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.server.port, 8080);
        assert_eq!(sanitized.session.cookie_name, "mangaverse_session");
        assert!(sanitized.seed.enabled);
    }
}
