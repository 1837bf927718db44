use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::DeskResult;

/// DbConnection owns the handle to the history database file.
///
/// Opened once at startup, cloned into whatever needs the store, and closed at
/// shutdown. The pool holds a single connection so every statement runs in
/// order, even when the REST shell receives overlapping requests.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl DbConnection {
    /// Open (creating if needed) the database at `path` and ensure the schema
    pub async fn open(path: &Path) -> DeskResult<Self> {
        info!("Opening history database at {}", path.display());

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .synchronous(SqliteSynchronous::Full);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
            path: path.to_path_buf(),
        })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the history table if it does not exist. Safe to call repeatedly.
    pub async fn initialize(&self) -> DeskResult<()> {
        Self::setup_schema(&self.pool).await
    }

    /// Close every connection. Later queries fail with a storage error.
    pub async fn close(&self) {
        info!("Closing history database at {}", self.path.display());
        self.pool.close().await;
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> DeskResult<()> {
        // AUTOINCREMENT: ids are never reused
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS operations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                a REAL NOT NULL,
                op TEXT NOT NULL CHECK (op IN ('+', '-', '*', '/')),
                b REAL NOT NULL,
                result REAL NOT NULL,
                CHECK (NOT (op = '/' AND b = 0))
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}
