use std::time::Duration;

use anyhow::Result;
use backoff::{ExponentialBackoff, future::retry_notify};
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;

pub type DbPool = sqlx::PgPool;
pub type OrmConn = DatabaseConnection;

/// Connect the shared pool, retrying with exponential backoff until
/// `db_connect_max_elapsed` has passed.
pub async fn create_pool(config: &AppConfig) -> Result<DbPool> {
    let policy = connect_backoff(config.db_connect_max_elapsed);
    let max_connections = config.db_max_connections;
    let url = config.database_url.clone();

    let pool = retry_notify(
        policy,
        || {
            let url = url.clone();
            async move {
                PgPoolOptions::new()
                    .max_connections(max_connections)
                    .acquire_timeout(Duration::from_secs(5))
                    .connect(&url)
                    .await
                    .map_err(backoff::Error::transient)
            }
        },
        |err: sqlx::Error, wait: Duration| {
            tracing::warn!(error = %err, wait_ms = %wait.as_millis(), "database connect failed, retrying");
        },
    )
    .await?;

    Ok(pool)
}

/// Apply the SQL files under `migrations/`.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Wrap the sqlx pool so SeaORM shares the same connections.
pub fn orm_from_pool(pool: &DbPool) -> OrmConn {
    SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone())
}

pub fn connect_backoff(max_elapsed: Duration) -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_secs(10),
        multiplier: 2.0,
        max_elapsed_time: Some(max_elapsed),
        ..Default::default()
    }
}
