use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};
use std::time::Duration;

const MAX_CONNECT_ATTEMPTS: u32 = 5;

/// Connects the direct Postgres pool, retrying with exponential backoff
/// while the database comes up.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 0;
    let mut wait_seconds = 2;

    loop {
        match PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                info!("Database connection established.");
                return Ok(pool);
            }
            Err(e) if attempt < MAX_CONNECT_ATTEMPTS => {
                attempt += 1;
                warn!(
                    "Failed to connect to database (attempt {}/{}): {}. Retrying in {}s...",
                    attempt, MAX_CONNECT_ATTEMPTS, e, wait_seconds
                );

                tokio::time::sleep(Duration::from_secs(wait_seconds)).await;
                wait_seconds *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Creates the content tables when they are missing.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Content table migrations applied.");
    Ok(())
}
