//! Display formatting for album attributes.
//!
//! Every column renderer reduces to one of these functions so the GTK
//! widgets and the tests agree on the text shown for a record.

use crate::library::{Album, MAX_RATING};

/// Formats a duration in seconds as `M:SS`, or `H:MM:SS` from one hour up.
///
/// Fractional seconds are truncated; negative input is treated as zero.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.max(0.0).floor() as u64;
    let hours = total / 3600;
    let minutes = (total / 60) % 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Formats a year range such as `1995-1999`.
///
/// Collapses to a single year when both ends match and omits unknown (zero)
/// ends, so an album without year tags renders as an empty string.
#[must_use]
pub fn format_range(min: i64, max: i64) -> String {
    let mut parts = Vec::with_capacity(2);
    if min != 0 {
        parts.push(min.to_string());
    }
    if max != 0 && max != min {
        parts.push(max.to_string());
    }
    parts.join("-")
}

/// Formats the year range of an album.
#[must_use]
pub fn format_year_range(album: &Album) -> String {
    format_range(album.min_year, album.max_year)
}

/// Renders a rating as five star glyphs, filled up to `rating`.
#[must_use]
pub fn format_rating(rating: i64) -> String {
    let filled = rating.clamp(0, MAX_RATING);
    (1..=MAX_RATING)
        .map(|star| if star <= filled { '★' } else { '☆' })
        .collect()
}
