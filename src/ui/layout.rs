//! Viewport classification and layout selection.
//!
//! The window's breakpoints classify its allocated width into one of three
//! viewport classes; the album views choose their presentation from that
//! class alone.

/// Widths strictly below this are classified as extra-small.
pub const XSMALL_MAX_WIDTH: i32 = 600;

/// Widths at or above this are classified as desktop.
pub const DESKTOP_MIN_WIDTH: i32 = 960;

/// Coarse classification of the available window width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewportClass {
    /// Phone-sized windows.
    ExtraSmall,
    /// Wide windows with room for every column.
    #[default]
    Desktop,
    /// Anything in between.
    Other,
}

impl ViewportClass {
    /// Classifies a window width in logical pixels.
    #[must_use]
    pub fn from_width(width: i32) -> Self {
        if width < XSMALL_MAX_WIDTH {
            Self::ExtraSmall
        } else if width >= DESKTOP_MIN_WIDTH {
            Self::Desktop
        } else {
            Self::Other
        }
    }

    #[must_use]
    pub fn is_desktop(self) -> bool {
        self == Self::Desktop
    }

    #[must_use]
    pub fn is_extra_small(self) -> bool {
        self == Self::ExtraSmall
    }
}

/// Presentation used to render a list of albums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Three-line summary per album with a trailing menu.
    Compact,
    /// Multi-column table, one row per album.
    Table,
}

/// Chooses the presentation for a viewport.
///
/// Evaluated on every render; there is no hysteresis between modes.
#[must_use]
pub fn select_layout(viewport: ViewportClass) -> LayoutMode {
    match viewport {
        ViewportClass::ExtraSmall => LayoutMode::Compact,
        ViewportClass::Desktop | ViewportClass::Other => LayoutMode::Table,
    }
}
