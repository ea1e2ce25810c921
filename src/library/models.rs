//! Data models for the music library database.
//!
//! This module defines the album record read by the album views, with
//! serde serialization and `sqlx` row mapping.

use {
    serde::{Deserialize, Serialize},
    sqlx::FromRow,
};

/// Represents a musical album in the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Default)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    /// Unique database ID.
    pub id: i64,
    /// Album title.
    pub name: String,
    /// Display name of the track artist.
    pub artist: String,
    /// Display name of the album artist.
    pub album_artist: String,
    /// Number of songs on the album.
    pub song_count: i64,
    /// Number of times the album has been played.
    pub play_count: i64,
    /// Total duration in seconds.
    pub duration: f64,
    /// Earliest release year across the album's tracks (0 if unknown).
    pub min_year: i64,
    /// Latest release year across the album's tracks (0 if unknown).
    pub max_year: i64,
    /// Whether the album is marked as favourite.
    pub starred: bool,
    /// Timestamp when the album was starred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred_at: Option<String>,
    /// User rating from 0 (unrated) to 5.
    pub rating: i64,
}

impl Album {
    /// Name shown on the secondary line of compact rows.
    ///
    /// Falls back to the track artist when no album artist is tagged.
    #[must_use]
    pub fn display_album_artist(&self) -> &str {
        if self.album_artist.is_empty() {
            &self.artist
        } else {
            &self.album_artist
        }
    }
}
