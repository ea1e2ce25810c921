//! Centralized state management with reactive updates to UI components.
//!
//! This module provides the shared state the album views render from and
//! the event channel they publish intents on.

pub mod app_state;

pub use app_state::{AlbumAction, AppState, AppStateEvent, LibraryState, NavigationIntent};
