//! Albumview - responsive album table for a music library
//!
//! Shows a music library's albums either as compact three-line entries on
//! narrow windows or as a sortable table whose optional columns depend on
//! the window size, the enabled features and the user's column choices.
//! Table rows can be dragged onto playlist drop zones.

pub mod config;
pub mod error;
pub mod library;
pub mod state;
pub mod ui;

// Re-export key types for convenience
pub use {
    config::{FeatureConfig, SettingsManager, UserSettings},
    error::{AppError, UiError},
    library::{Album, AlbumSort, LibraryDatabase, LibraryError},
    state::{AppState, AppStateEvent, LibraryState},
    ui::AlbumViewApplication,
};
