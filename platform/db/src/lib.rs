//! Database primitives and the model layer for departments and employees.

use std::time::Duration;

use rand::Rng;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use serde::Deserialize;
use thiserror::Error;

pub mod departments;
pub mod employees;
pub mod validation;

pub use validation::{FieldError, FieldErrorKind, ValidationErrors};

/// Shared connection pool alias.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing")]
    MissingUrl,
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("store error: {0}")]
    Store(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

const DEFAULT_DATABASE_URL: &str = "sqlite://company.db?mode=rwc";
const MEMORY_DATABASE_URL: &str = "sqlite::memory:";
// Recycling or reaping the only connection would drop the in-memory database
// with it.
const MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Environment-driven connection settings.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub sql_logging: bool,
}

fn default_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            sql_logging: false,
        }
    }
}

impl DatabaseSettings {
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            settings.url = url;
        }
        if let Some(max) = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
        {
            settings.max_connections = max;
        }
        settings.sql_logging = std::env::var("DB_SQL_LOGGING")
            .ok()
            .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        settings
    }

    /// A private SQLite database that lives as long as the pool. Every
    /// connection to `sqlite::memory:` opens a fresh database, so the pool is
    /// pinned to one connection.
    pub fn in_memory() -> Self {
        Self {
            url: MEMORY_DATABASE_URL.to_string(),
            max_connections: 1,
            sql_logging: false,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }
}

pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    if settings.url.trim().is_empty() {
        return Err(DbError::MissingUrl);
    }
    let pool = Database::connect(connect_options(settings)).await?;
    tracing::debug!(backend = ?pool.get_database_backend(), "database connected");
    Ok(pool)
}

fn connect_options(settings: &DatabaseSettings) -> ConnectOptions {
    let mut options = ConnectOptions::new(settings.url.clone());
    options
        .max_connections(settings.max_connections.max(1))
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(settings.sql_logging);
    if settings.is_in_memory() {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(MEMORY_CONNECTION_LIFETIME)
            .max_lifetime(MEMORY_CONNECTION_LIFETIME);
    }
    options
}

/// Picks a uniformly random offset in `[0, count)`, or `None` when there is
/// nothing to pick from.
pub(crate) fn random_offset(count: u64) -> Option<u64> {
    if count == 0 {
        return None;
    }
    Some(rand::thread_rng().gen_range(0..count))
}
