//! Database schema definition and versioning for the album library.
//!
//! This module defines the SQLite schema backing the album views and
//! provides schema versioning for future migrations.

use std::path::{Path, PathBuf};

use {
    sqlx::{
        Error as SqlxError, SqlitePool, query, query_scalar,
        sqlite::{SqliteConnectOptions, SqliteJournalMode::Wal, SqliteSynchronous::Normal},
    },
    thiserror::Error,
    tracing::debug,
};

use crate::config::settings::get_data_dir;

/// Error type for schema operations.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] SqlxError),
    /// Schema migration error.
    #[error("Schema migration error: {reason}")]
    MigrationError { reason: String },
}

/// Current schema version.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Database schema definition.
#[derive(Debug)]
pub struct SchemaManager {
    pool: SqlitePool,
}

impl SchemaManager {
    /// Creates a new schema manager.
    ///
    /// # Arguments
    ///
    /// * `pool` - The SQLite connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initializes the database schema.
    ///
    /// Creates all tables on a fresh database and checks the stored
    /// version on an existing one.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if schema initialization fails.
    pub async fn initialize_schema(&self) -> Result<(), SchemaError> {
        query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)")
            .execute(&self.pool)
            .await?;

        match self.stored_version().await? {
            None => {
                debug!("Initializing fresh library schema v{CURRENT_SCHEMA_VERSION}");
                self.create_tables().await?;
                query("INSERT INTO schema_version (version) VALUES (?)")
                    .bind(CURRENT_SCHEMA_VERSION)
                    .execute(&self.pool)
                    .await?;
            }
            Some(version) if version == CURRENT_SCHEMA_VERSION => {}
            Some(version) => {
                return Err(SchemaError::MigrationError {
                    reason: format!("Schema migration from version {version} not implemented"),
                });
            }
        }

        Ok(())
    }

    /// Creates all database tables.
    async fn create_tables(&self) -> Result<(), SchemaError> {
        query(
            r"
            CREATE TABLE albums (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                artist TEXT NOT NULL DEFAULT '',
                album_artist TEXT NOT NULL DEFAULT '',
                song_count INTEGER NOT NULL DEFAULT 0,
                play_count INTEGER NOT NULL DEFAULT 0,
                duration REAL NOT NULL DEFAULT 0,
                min_year INTEGER NOT NULL DEFAULT 0,
                max_year INTEGER NOT NULL DEFAULT 0,
                starred BOOLEAN NOT NULL DEFAULT FALSE,
                starred_at TEXT,
                rating INTEGER NOT NULL DEFAULT 0 CHECK (rating BETWEEN 0 AND 5)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        query("CREATE INDEX idx_albums_name ON albums (name)")
            .execute(&self.pool)
            .await?;

        query("CREATE INDEX idx_albums_max_year ON albums (max_year)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Gets the current schema version, or 0 if not initialized.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the version table cannot be read.
    pub async fn get_current_version(&self) -> Result<i32, SchemaError> {
        Ok(self.stored_version().await?.unwrap_or(0))
    }

    async fn stored_version(&self) -> Result<Option<i32>, SchemaError> {
        let version = query_scalar("SELECT version FROM schema_version LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(version)
    }
}

/// Gets the default database path following the XDG Base Directory specification.
#[must_use]
pub fn get_database_path() -> PathBuf {
    let mut path = get_data_dir();
    path.push("library.db");
    path
}

/// Creates a database connection pool for the given file.
///
/// # Errors
///
/// Returns `SchemaError` if the parent directory cannot be created or the
/// connection pool cannot be opened.
pub async fn create_connection_pool(path: &Path) -> Result<SqlitePool, SchemaError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SchemaError::MigrationError {
            reason: format!("cannot create {}: {e}", parent.display()),
        })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(Wal)
        .synchronous(Normal);

    let pool = SqlitePool::connect_with(options).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::library::schema::{
        CURRENT_SCHEMA_VERSION, SchemaError, SchemaManager, create_connection_pool,
    };

    #[test]
    fn test_schema_version_constant() {
        assert_eq!(CURRENT_SCHEMA_VERSION, 1);
    }

    #[test]
    fn test_schema_error_display() {
        let migration_error = SchemaError::MigrationError {
            reason: "test error".to_string(),
        };
        assert_eq!(
            migration_error.to_string(),
            "Schema migration error: test error"
        );
    }

    #[tokio::test]
    async fn test_initialize_schema_is_idempotent() {
        let dir = tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("nested/library.db"))
            .await
            .unwrap();
        let manager = SchemaManager::new(pool);

        manager.initialize_schema().await.unwrap();
        manager.initialize_schema().await.unwrap();
        assert_eq!(
            manager.get_current_version().await.unwrap(),
            CURRENT_SCHEMA_VERSION
        );
    }
}
