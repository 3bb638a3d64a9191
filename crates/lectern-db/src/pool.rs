use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;

/// Connects a PostgreSQL pool. The pool is cheap to clone and is shared
/// through application state.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;

    info!(max_connections = MAX_CONNECTIONS, "Database pool initialized");
    Ok(pool)
}

/// Applies the migrations under `migrations/` at the workspace root.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
