//! # Campus DB
//!
//! Database pool, embedded migrations and the Postgres implementations of
//! the auth storage contracts.
//!
//! - [`users`]: [`PgUserDirectory`]
//! - [`refresh_tokens`]: [`PgRefreshTokenLedger`]
//!
//! # Example
//!
//! ```ignore
//! use campus_db::{MIGRATOR, init_db_pool};
//!
//! let pool = init_db_pool(&database_url).await?;
//! MIGRATOR.run(&pool).await?;
//! ```

pub mod refresh_tokens;
pub mod users;

use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

pub use refresh_tokens::PgRefreshTokenLedger;
pub use users::PgUserDirectory;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Migrations under `migrations/` at the workspace root, embedded at compile
/// time.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens a PostgreSQL connection pool.
///
/// Called once at startup; the pool is cheap to clone and is shared by the
/// storage types in this crate.
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    tracing::info!("Database pool initialized");
    Ok(pool)
}

/// Wraps a driver error for the auth storage contracts.
pub(crate) fn boxed(err: sqlx::Error) -> campus_auth::BoxError {
    Box::new(err)
}
