pub mod models;
pub mod services;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

/// Embedded migrations, applied in order on startup. Every statement is
/// idempotent (`CREATE TABLE IF NOT EXISTS`), so re-running them against an
/// existing database is safe.
const MIGRATIONS: &[&str] = &[
    include_str!("../../migrations/20250601000001_create_users.sql"),
    include_str!("../../migrations/20250601000002_create_tags.sql"),
    include_str!("../../migrations/20250601000003_create_recipes.sql"),
    include_str!("../../migrations/20250601000004_create_recipe_tags.sql"),
];

/// Opens a SQLite pool for the given URL and brings the schema up to date.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    info!(url = %database_url, "database ready");
    Ok(pool)
}

/// In-memory database for tests. A single connection is mandatory here:
/// every new `:memory:` connection would otherwise see its own empty schema.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for migration in MIGRATIONS {
        sqlx::query(migration).execute(pool).await?;
    }
    Ok(())
}
