use anyhow::{Context, Result};
use sqlx::ConnectOptions;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use tracing::log::LevelFilter;

/// True if the URL names a database that lives only inside one connection
pub fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Connection pool settings for the keyword database
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Upper bound on pooled connections for file-backed databases
    pub max_connections: u32,
    /// How long to wait for a free connection
    pub acquire_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_connections: 4,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Connect to the keyword database
pub async fn connect_to_database(url: &str) -> Result<SqlitePool> {
    connect_with_config(url, &ConnectionConfig::default()).await
}

/// Connect to the keyword database with custom pool settings
///
/// An in-memory database is pinned to a single connection that is never
/// recycled, otherwise every new connection would see an empty database.
pub async fn connect_with_config(url: &str, config: &ConnectionConfig) -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid database URL: {}", url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .log_slow_statements(LevelFilter::Off, Duration::from_secs(0));

    let pool_options = if is_in_memory(url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    let pool = pool_options
        .acquire_timeout(config.acquire_timeout)
        .connect_with(connect_options)
        .await
        .with_context(|| format!("Failed to open keyword database at {}", url))?;

    info!("Connected to keyword database");
    Ok(pool)
}
