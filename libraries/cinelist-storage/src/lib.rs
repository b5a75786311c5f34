//! Cinelist Storage
//!
//! `SQLite` persistence layer for Cinelist accounts and playlists.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature (`users`, `playlists`) owns its own queries
//! - **Owner Scoping**: every playlist query filters by the owning username
//! - **Atomic Mutations**: each mutating call is one transaction that also
//!   stamps `updated_at`
//!
//! # Example
//!
//! ```rust,no_run
//! use cinelist_core::{PlaylistStore, Username};
//! use cinelist_storage::{create_pool, run_migrations, SqliteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cinelist.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteStore::new(pool);
//! let playlists = store.list_playlists(&Username::new("alice")).await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod playlists;
pub mod users;

pub use context::SqliteStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connection pool tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    /// Upper bound on open connections
    pub max_connections: u32,
    /// How long a writer waits for a lock before failing
    pub busy_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout: Duration::from_secs(30),
        }
    }
}

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool with default options
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://cinelist.db>`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    create_pool_with(database_url, PoolOptions::default()).await
}

/// Create a new `SQLite` pool
///
/// The database file and its parent directory are created if missing.
pub async fn create_pool_with(
    database_url: &str,
    options: PoolOptions,
) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    if !database_url.starts_with("sqlite:") {
        return Err(StorageError::Connection(format!(
            "unsupported database url scheme (expected sqlite:): {}",
            database_url.split("://").next().unwrap_or_default()
        )));
    }

    tracing::debug!(%database_url, "creating sqlite pool");

    let connect_options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(options.busy_timeout);

    if let Some(parent) = connect_options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .connect_with(connect_options)
        .await?;

    tracing::debug!(
        max_connections = options.max_connections,
        "sqlite pool created"
    );

    Ok(pool)
}
