use std::num::NonZeroUsize;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub pastes: PasteConfig,
}

impl Config {
    /// Load configuration from `config.toml` (if present) and the
    /// environment, with environment values taking precedence.
    pub fn load() -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::with_name("config.toml").required(false))
            .add_source(config::Environment::with_prefix("MINIBIN").separator("__"))
            .build()
            .context("failed to read config")?
            .try_deserialize()
            .context("failed to deserialize config")
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8020,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            cache: CacheConfig::default(),
            pastes: PasteConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: "sqlite:minibin.db?mode=rwc".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Where unauthenticated requests to gated routes are sent.
    pub login_url: String,
    /// Trusted header carrying the signed-in user's email. Set by the
    /// identity-aware proxy in front of the app, never by clients.
    pub identity_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            login_url: "/login".into(),
            identity_header: "x-auth-request-email".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub capacity: usize,
}

impl CacheConfig {
    /// Capacity clamped away from zero; an LRU cache must hold at least
    /// one entry.
    pub fn capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PasteConfig {
    /// Length of generated public identifiers.
    pub id_length: usize,
}

impl Default for PasteConfig {
    fn default() -> Self {
        PasteConfig { id_length: 8 }
    }
}
