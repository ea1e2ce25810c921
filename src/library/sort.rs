//! Sort keys and ordering for album queries.
//!
//! Column descriptors carry an [`AlbumSort`] describing how the column sorts
//! by default; the database maps each key onto a whitelisted `ORDER BY`
//! clause so no user-provided text ever reaches SQL.

use serde::{Deserialize, Serialize};

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOrder {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortOrder {
    /// Returns the opposite direction.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// SQL keyword for this direction.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Attribute an album list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortKey {
    /// Album title.
    #[default]
    Name,
    /// Track artist name.
    Artist,
    /// Number of songs.
    SongCount,
    /// Number of plays.
    PlayCount,
    /// Latest release year of the album's range.
    MaxYear,
    /// Total duration.
    Duration,
    /// User rating.
    Rating,
    /// Favourite flag, then the time it was starred.
    Starred,
}

impl SortKey {
    /// Database columns this key sorts by, in priority order.
    #[must_use]
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Name => &["name"],
            Self::Artist => &["artist"],
            Self::SongCount => &["song_count"],
            Self::PlayCount => &["play_count"],
            Self::MaxYear => &["max_year"],
            Self::Duration => &["duration"],
            Self::Rating => &["rating"],
            Self::Starred => &["starred", "starred_at"],
        }
    }
}

/// A sort key together with its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct AlbumSort {
    /// Attribute to sort by.
    pub key: SortKey,
    /// Sort direction.
    pub order: SortOrder,
}

impl AlbumSort {
    /// Creates a new sort.
    #[must_use]
    pub const fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    /// Computes the sort that results from clicking a column header.
    ///
    /// Clicking the column that is already sorted flips its direction;
    /// clicking any other column starts from that column's default sort.
    #[must_use]
    pub fn toggled(self, column_default: AlbumSort) -> Self {
        if self.key == column_default.key {
            Self::new(self.key, self.order.reversed())
        } else {
            column_default
        }
    }

    /// Builds the `ORDER BY` body, with the album name as final tie-break.
    #[must_use]
    pub fn order_by_clause(self) -> String {
        let direction = self.order.as_sql();
        let mut terms: Vec<String> = self
            .key
            .columns()
            .iter()
            .map(|column| format!("{column} {direction}"))
            .collect();
        if self.key != SortKey::Name {
            terms.push("name ASC".to_string());
        }
        terms.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use crate::library::sort::{
        AlbumSort,
        SortKey::{MaxYear, Name, PlayCount, Starred},
        SortOrder::{Asc, Desc},
    };

    #[test]
    fn test_order_by_clause() {
        assert_eq!(AlbumSort::new(Name, Asc).order_by_clause(), "name ASC");
        assert_eq!(
            AlbumSort::new(MaxYear, Desc).order_by_clause(),
            "max_year DESC, name ASC"
        );
        assert_eq!(
            AlbumSort::new(Starred, Desc).order_by_clause(),
            "starred DESC, starred_at DESC, name ASC"
        );
    }

    #[test]
    fn test_toggle_same_column_flips_direction() {
        let current = AlbumSort::new(PlayCount, Desc);
        let next = current.toggled(AlbumSort::new(PlayCount, Desc));
        assert_eq!(next, AlbumSort::new(PlayCount, Asc));
        assert_eq!(
            next.toggled(AlbumSort::new(PlayCount, Desc)),
            AlbumSort::new(PlayCount, Desc)
        );
    }

    #[test]
    fn test_toggle_other_column_uses_its_default() {
        let current = AlbumSort::new(Name, Asc);
        let next = current.toggled(AlbumSort::new(MaxYear, Desc));
        assert_eq!(next, AlbumSort::new(MaxYear, Desc));
    }

    #[test]
    fn test_default_sort_is_name_ascending() {
        assert_eq!(AlbumSort::default(), AlbumSort::new(Name, Asc));
    }
}
