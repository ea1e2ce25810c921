//! Reusable UI components following GNOME HIG guidelines.
//!
//! This module provides the per-row widgets of the album view, the GTK
//! side of album drag and drop, and the window breakpoints.


pub mod context_menu;
pub mod drag_source;
pub mod viewport;

pub use {
    context_menu::AlbumContextMenu,
    drag_source::{GtkDragTransport, album_drop_target},
    viewport::ViewportBreakpoints,
};
