//! Background worker that serializes library reads and writes.
//!
//! Views publish sort and album-action requests; the worker applies them to
//! the database one at a time and pushes the refreshed album list into
//! [`AppState`]. Running them in order guarantees a reload always observes
//! the mutation requested before it.

use std::sync::Arc;

use {
    anyhow::Result,
    async_channel::{Receiver, Sender, unbounded},
    tracing::{debug, info},
};

use crate::{
    error::{ErrorReporter, ResultExt},
    library::{LibraryDatabase, sort::AlbumSort},
    state::{AlbumAction, AppState},
};

/// Work items accepted by the [`LibraryWorker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryCommand {
    /// Reload every album with the given sort.
    Reload(AlbumSort),
    /// Apply a mutation, then reload with the current sort.
    Apply(AlbumAction),
}

/// Handle to the library worker task.
#[derive(Debug, Clone)]
pub struct LibraryWorker {
    command_tx: Sender<LibraryCommand>,
}

impl LibraryWorker {
    /// Starts the worker on the current tokio runtime.
    #[must_use]
    pub fn spawn(db: LibraryDatabase, app_state: Arc<AppState>) -> Self {
        let (command_tx, command_rx) = unbounded();
        let sync = LibrarySync { db, app_state };
        tokio::spawn(sync.run(command_rx));
        Self { command_tx }
    }

    /// Queues a reload with `sort`.
    pub fn reload(&self, sort: AlbumSort) {
        self.send(LibraryCommand::Reload(sort));
    }

    /// Queues an album mutation.
    pub fn apply(&self, action: AlbumAction) {
        self.send(LibraryCommand::Apply(action));
    }

    fn send(&self, command: LibraryCommand) {
        if let Err(e) = self.command_tx.try_send(command) {
            debug!("LibraryWorker: Failed to queue {command:?}: {e}");
        }
    }
}

/// State owned by the worker task.
#[derive(Debug, Clone)]
struct LibrarySync {
    db: LibraryDatabase,
    app_state: Arc<AppState>,
}

impl LibrarySync {
    async fn run(self, command_rx: Receiver<LibraryCommand>) {
        while let Ok(command) = command_rx.recv().await {
            if let Err(error) = self.handle(command).await {
                ErrorReporter::warn(&error, "library worker");
                self.app_state
                    .report_error(ErrorReporter::to_user_message(&error));
            }
        }
        debug!("LibraryWorker: command channel closed");
    }

    async fn handle(&self, command: LibraryCommand) -> Result<()> {
        match command {
            LibraryCommand::Reload(sort) => self.reload(sort).await,
            LibraryCommand::Apply(action) => {
                match action {
                    AlbumAction::SetStarred { album_id, starred } => self
                        .db
                        .set_starred(album_id, starred)
                        .await
                        .add_contextf(format_args!("Updating favourite of album {album_id}"))?,
                    AlbumAction::SetRating { album_id, rating } => self
                        .db
                        .set_rating(album_id, rating)
                        .await
                        .add_contextf(format_args!("Rating album {album_id}"))?,
                }
                let sort = self.app_state.get_library_state().sort;
                self.reload(sort).await
            }
        }
    }

    async fn reload(&self, sort: AlbumSort) -> Result<()> {
        let albums = self
            .db
            .list_albums(&sort)
            .await
            .add_context("Loading albums")?;
        info!(count = albums.len(), ?sort, "Albums loaded");
        self.app_state.update_albums(albums, sort);
        Ok(())
    }
}
