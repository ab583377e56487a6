//! # SQLite Connection
//!
//! One database file per shop. Opening it applies the embedded migrations,
//! after which the collections are reachable through [`Database::collections`].
//!
//! ```text
//! DbConfig::new(path) ──► Database::new ──► SqlitePool (WAL) ──► migrations
//!                                                │
//!                                                └──► CollectionRepository
//! ```
//!
//! The shop writes sequentially, so the pool stays small. An in-memory
//! database lives on a single connection that is never recycled.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;
use crate::migrations;
use crate::repository::collection::CollectionRepository;

const MEMORY_PATH: &str = ":memory:";

/// Where the shop data lives and how long a locked file is waited on.
#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// File-backed database, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            path: path.into(),
            max_connections: 2,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Private in-memory database. Every `Database::new` starts empty.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            ..DbConfig::new(MEMORY_PATH)
        }
    }

    fn is_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = if self.is_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else {
            SqliteConnectOptions::new()
                .filename(&self.path)
                .create_if_missing(true)
        };

        Ok(options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(self.busy_timeout))
    }
}

/// Handle to the shop database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database and applies pending migrations.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        if config.is_memory() {
            // Closing the only connection would drop the data with it
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(config.connect_options()?).await?;
        migrations::run_migrations(&pool).await?;

        info!(path = %config.path.display(), "Database opened");
        Ok(Database { pool })
    }

    pub fn collections(&self) -> CollectionRepository {
        CollectionRepository::new(self.pool.clone())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::collection::Collection;
    use vendinha_core::seed::seed_clients;

    #[tokio::test]
    async fn test_in_memory_database_starts_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.collections().counts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_databases_are_separate() {
        let a = Database::new(DbConfig::in_memory()).await.unwrap();
        let b = Database::new(DbConfig::in_memory()).await.unwrap();

        a.collections()
            .replace(Collection::Clients, seed_clients().as_slice())
            .await
            .unwrap();

        assert!(a.collections().exists(Collection::Clients).await.unwrap());
        assert!(!b.collections().exists(Collection::Clients).await.unwrap());
    }

    #[test]
    fn test_config() {
        let config = DbConfig::new("/tmp/vendinha.db");
        assert!(!config.is_memory());
        assert_eq!(config.max_connections, 2);

        let memory = DbConfig::in_memory();
        assert!(memory.is_memory());
        assert_eq!(memory.max_connections, 1);
    }
}
