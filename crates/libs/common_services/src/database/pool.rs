use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Pool, Postgres};
use std::time::Duration;
use tracing::info;

/// Get a database connection pool.
///
/// # Errors
///
/// * `PgPoolOptions::connect` can return an error if the database connection fails.
pub async fn get_db_pool(database_url: &str) -> color_eyre::Result<Pool<Postgres>> {
    info!("Connecting to database.");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Apply the embedded schema migrations.
///
/// # Errors
///
/// * `sqlx::migrate` can return an error if migrations fail.
pub async fn run_migrations(pool: &PgPool) -> color_eyre::Result<()> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}
