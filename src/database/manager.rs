use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the Postgres connection pool shared by every request
pub struct DatabaseManager;

impl DatabaseManager {
    /// Connect a pool sized and timed out according to config
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let connection_string = Self::build_connection_string(config)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        info!(
            "Created database pool for {}:{}/{} (max {} connections)",
            config.host, config.port, config.name, config.max_connections
        );
        Ok(pool)
    }

    /// Use DATABASE_URL verbatim when set, otherwise assemble one from its parts
    fn build_connection_string(config: &DatabaseConfig) -> Result<String, DatabaseError> {
        if let Some(raw) = &config.url {
            let url = url::Url::parse(raw).map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;
            return Ok(url.into());
        }

        let base = format!("postgres://{}:{}/{}", config.host, config.port, config.name);
        let mut url = url::Url::parse(&base).map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;
        url.set_username(&config.user)
            .map_err(|_| DatabaseError::InvalidDatabaseUrl("cannot set username".to_string()))?;
        url.set_password(Some(&config.password))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl("cannot set password".to_string()))?;
        url.query_pairs_mut().append_pair("sslmode", "disable");
        Ok(url.into())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
