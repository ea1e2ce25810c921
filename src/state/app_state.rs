//! Global application state with reactive update mechanisms.
//!
//! This module provides the central `AppState` container shared by the
//! album views and the application shell. Views never act on the library or
//! navigate themselves; they publish intents here and the shell handles them.

use std::sync::Arc;

use {
    parking_lot::RwLock,
    tokio::sync::broadcast::{Receiver, Sender, channel},
    tracing::debug,
};

use crate::{
    library::{Album, AlbumSort},
    ui::layout::ViewportClass,
};

/// Central state container with thread-safe access.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current library view state.
    pub library: Arc<RwLock<LibraryState>>,
    /// Current viewport classification.
    pub viewport: Arc<RwLock<ViewportClass>>,
    /// Broadcast channel for state change notifications.
    state_tx: Sender<AppStateEvent>,
}

/// Current library view state.
#[derive(Debug, Clone, Default)]
pub struct LibraryState {
    /// Currently displayed albums, in display order.
    pub albums: Vec<Album>,
    /// Sort the albums were loaded with.
    pub sort: AlbumSort,
}

/// Request to show another page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Show the detail page of an album.
    ShowAlbum(i64),
    /// Show the albums of an artist.
    ShowArtist(String),
}

/// Per-album mutation requested from a context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumAction {
    /// Set the favourite flag.
    SetStarred { album_id: i64, starred: bool },
    /// Set the rating (0 clears it).
    SetRating { album_id: i64, rating: i64 },
}

impl AlbumAction {
    /// Action flipping the favourite flag of `album`.
    #[must_use]
    pub fn toggle_starred(album: &Album) -> Self {
        Self::SetStarred {
            album_id: album.id,
            starred: !album.starred,
        }
    }

    /// Action for clicking star `clicked` on `album`.
    ///
    /// Clicking the star matching the current rating clears it.
    #[must_use]
    pub fn rate(album: &Album, clicked: i64) -> Self {
        let rating = if album.rating == clicked { 0 } else { clicked };
        Self::SetRating {
            album_id: album.id,
            rating,
        }
    }
}

/// Application state change events.
#[derive(Debug, Clone)]
pub enum AppStateEvent {
    /// Viewport classification changed.
    ViewportChanged(ViewportClass),
    /// Album list replaced.
    AlbumsChanged,
    /// A different sort was requested.
    SortRequested(AlbumSort),
    /// A view asked to navigate.
    NavigationRequested(NavigationIntent),
    /// A context menu asked to change an album.
    AlbumActionRequested(AlbumAction),
    /// A background operation failed; the message is meant for the user.
    ErrorReported(String),
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates a new application state instance.
    #[must_use]
    pub fn new() -> Self {
        let (state_tx, _) = channel(64);

        Self {
            library: Arc::new(RwLock::new(LibraryState::default())),
            viewport: Arc::new(RwLock::new(ViewportClass::default())),
            state_tx,
        }
    }

    /// Records a new viewport classification.
    ///
    /// Subscribers are only notified when the class actually changes.
    pub fn update_viewport(&self, viewport: ViewportClass) {
        let previous = std::mem::replace(&mut *self.viewport.write(), viewport);
        if previous != viewport {
            debug!(?previous, current = ?viewport, "Viewport class changed");
            let _ = self.state_tx.send(AppStateEvent::ViewportChanged(viewport));
        }
    }

    /// Replaces the displayed albums and the sort they were loaded with.
    pub fn update_albums(&self, albums: Vec<Album>, sort: AlbumSort) {
        *self.library.write() = LibraryState { albums, sort };
        let _ = self.state_tx.send(AppStateEvent::AlbumsChanged);
    }

    /// Asks the shell to reload albums with `sort`.
    pub fn request_sort(&self, sort: AlbumSort) {
        let _ = self.state_tx.send(AppStateEvent::SortRequested(sort));
    }

    /// Publishes a navigation intent.
    pub fn request_navigation(&self, intent: NavigationIntent) {
        debug!(?intent, "Navigation requested");
        let _ = self
            .state_tx
            .send(AppStateEvent::NavigationRequested(intent));
    }

    /// Publishes an album mutation request.
    pub fn request_album_action(&self, action: AlbumAction) {
        let _ = self
            .state_tx
            .send(AppStateEvent::AlbumActionRequested(action));
    }

    /// Publishes a user-facing failure message.
    pub fn report_error(&self, message: impl Into<String>) {
        let _ = self
            .state_tx
            .send(AppStateEvent::ErrorReported(message.into()));
    }

    /// Subscribes to application state changes.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<AppStateEvent> {
        self.state_tx.subscribe()
    }

    #[must_use]
    pub fn get_viewport(&self) -> ViewportClass {
        *self.viewport.read()
    }

    #[must_use]
    pub fn get_library_state(&self) -> LibraryState {
        self.library.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        library::{Album, AlbumSort, SortKey::MaxYear, SortOrder::Desc},
        state::app_state::{
            AlbumAction, AppState, AppStateEvent, LibraryState, NavigationIntent,
        },
        ui::layout::ViewportClass::{Desktop, ExtraSmall},
    };

    #[test]
    fn test_app_state_creation() {
        let app_state = AppState::new();
        assert_eq!(app_state.get_viewport(), Desktop);
        assert!(app_state.get_library_state().albums.is_empty());
    }

    #[test]
    fn test_library_state_default() {
        let library_state = LibraryState::default();
        assert!(library_state.albums.is_empty());
        assert_eq!(library_state.sort, AlbumSort::default());
    }

    #[test]
    fn test_viewport_change_notifies_once() {
        let app_state = AppState::new();
        let mut rx = app_state.subscribe();

        app_state.update_viewport(Desktop);
        app_state.update_viewport(ExtraSmall);
        app_state.update_viewport(ExtraSmall);

        assert!(matches!(
            rx.try_recv(),
            Ok(AppStateEvent::ViewportChanged(ExtraSmall))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_update_albums_stores_sort() {
        let app_state = AppState::new();
        let mut rx = app_state.subscribe();
        let sort = AlbumSort::new(MaxYear, Desc);

        app_state.update_albums(vec![Album::default()], sort);

        assert!(matches!(rx.try_recv(), Ok(AppStateEvent::AlbumsChanged)));
        let state = app_state.get_library_state();
        assert_eq!(state.albums.len(), 1);
        assert_eq!(state.sort, sort);
    }

    #[test]
    fn test_navigation_intent_is_broadcast() {
        let app_state = AppState::new();
        let mut rx = app_state.subscribe();

        app_state.request_navigation(NavigationIntent::ShowAlbum(42));

        match rx.try_recv() {
            Ok(AppStateEvent::NavigationRequested(intent)) => {
                assert_eq!(intent, NavigationIntent::ShowAlbum(42));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_report_error_is_broadcast() {
        let app_state = AppState::new();
        let mut rx = app_state.subscribe();

        app_state.report_error("Disk full");

        assert!(matches!(
            rx.try_recv(),
            Ok(AppStateEvent::ErrorReported(message)) if message == "Disk full"
        ));
    }

    #[test]
    fn test_album_actions() {
        let album = Album {
            id: 3,
            starred: false,
            rating: 4,
            ..Album::default()
        };

        assert_eq!(
            AlbumAction::toggle_starred(&album),
            AlbumAction::SetStarred {
                album_id: 3,
                starred: true
            }
        );
        assert_eq!(
            AlbumAction::rate(&album, 2),
            AlbumAction::SetRating {
                album_id: 3,
                rating: 2
            }
        );
        assert_eq!(
            AlbumAction::rate(&album, 4),
            AlbumAction::SetRating {
                album_id: 3,
                rating: 0
            }
        );
        assert_eq!(
            AlbumAction::rate(&album, 1),
            AlbumAction::SetRating {
                album_id: 3,
                rating: 1
            }
        );
    }
}
