//! Library database interface using sqlx with SQLite.
//!
//! This module provides the `LibraryDatabase` struct that supplies album
//! records to the views and applies the per-album mutations requested
//! through the context menu (favourite toggle, rating).

use std::path::Path;

use {
    sqlx::{Error as SqlxError, SqlitePool, query, query_as},
    thiserror::Error,
    tracing::debug,
};

use crate::library::{
    models::Album,
    schema::{SchemaError, SchemaManager, create_connection_pool},
    sort::AlbumSort,
};

/// Highest rating an album can carry.
pub const MAX_RATING: i64 = 5;

const ALBUM_COLUMNS: &str = "id, name, artist, album_artist, song_count, play_count, duration, \
                             min_year, max_year, starred, starred_at, rating";

/// Error type for library database operations.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),
    /// Schema initialization error.
    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaError),
    /// Invalid input data.
    #[error("Invalid data: {reason}")]
    InvalidData { reason: String },
    /// Record not found.
    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: i64 },
}

/// Main library database interface.
#[derive(Debug, Clone)]
pub struct LibraryDatabase {
    pool: SqlitePool,
}

impl LibraryDatabase {
    /// Opens (or creates) the library database at `path`.
    ///
    /// The schema is created on first use.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError` if the database cannot be opened or the
    /// schema cannot be initialized.
    pub async fn open(path: &Path) -> Result<Self, LibraryError> {
        debug!("Opening library database at {}", path.display());
        let pool = create_connection_pool(path).await?;
        SchemaManager::new(pool.clone()).initialize_schema().await?;
        Ok(Self { pool })
    }

    /// Gets all albums ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError` if the query fails.
    pub async fn list_albums(&self, sort: &AlbumSort) -> Result<Vec<Album>, LibraryError> {
        let sql = format!(
            "SELECT {ALBUM_COLUMNS} FROM albums ORDER BY {}",
            sort.order_by_clause()
        );
        let albums = query_as::<_, Album>(&sql).fetch_all(&self.pool).await?;
        Ok(albums)
    }

    /// Gets a single album by id.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotFound` if no album has this id.
    pub async fn get_album(&self, id: i64) -> Result<Album, LibraryError> {
        let sql = format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE id = ?");
        query_as::<_, Album>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Inserts an album and returns its new id.
    ///
    /// The `id` field of `album` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::InvalidData` for an out-of-range rating, or a
    /// database error if the insert fails.
    pub async fn insert_album(&self, album: &Album) -> Result<i64, LibraryError> {
        validate_rating(album.rating)?;
        let result = query(
            r"
            INSERT INTO albums (name, artist, album_artist, song_count, play_count, duration,
                                min_year, max_year, starred, starred_at, rating)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&album.name)
        .bind(&album.artist)
        .bind(&album.album_artist)
        .bind(album.song_count)
        .bind(album.play_count)
        .bind(album.duration)
        .bind(album.min_year)
        .bind(album.max_year)
        .bind(album.starred)
        .bind(&album.starred_at)
        .bind(album.rating)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Marks or unmarks an album as favourite.
    ///
    /// Starring records the current time; unstarring clears it.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotFound` if no album has this id.
    pub async fn set_starred(&self, id: i64, starred: bool) -> Result<(), LibraryError> {
        debug!(album_id = id, starred, "Updating favourite flag");
        let result = query(
            r"
            UPDATE albums
            SET starred = ?, starred_at = CASE WHEN ? THEN CURRENT_TIMESTAMP ELSE NULL END
            WHERE id = ?
            ",
        )
        .bind(starred)
        .bind(starred)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Sets the rating of an album (0 clears it).
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::InvalidData` for ratings above [`MAX_RATING`]
    /// and `LibraryError::NotFound` if no album has this id.
    pub async fn set_rating(&self, id: i64, rating: i64) -> Result<(), LibraryError> {
        validate_rating(rating)?;
        debug!(album_id = id, rating, "Updating rating");
        let result = query("UPDATE albums SET rating = ? WHERE id = ?")
            .bind(rating)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

fn validate_rating(rating: i64) -> Result<(), LibraryError> {
    if (0..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(LibraryError::InvalidData {
            reason: format!("rating {rating} outside 0..={MAX_RATING}"),
        })
    }
}

fn not_found(id: i64) -> LibraryError {
    LibraryError::NotFound {
        entity: "album".to_string(),
        id,
    }
}
