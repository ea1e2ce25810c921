//! Domain-specific error types using `thiserror`.
//!
//! Library and settings errors live next to the code that raises them; this
//! module adds the UI errors and the aggregate used at application startup.

use std::result::Result as StdResult;

use {anyhow::Error, thiserror::Error};

use crate::{config::SettingsError, library::LibraryError};

/// UI-related errors.
#[derive(Error, Debug)]
pub enum UiError {
    /// GTK/Libadwaita initialization error.
    #[error("UI initialization error: {0}")]
    InitializationError(String),
}

/// Errors that can abort application startup.
#[derive(Error, Debug)]
pub enum AppError {
    /// Settings could not be loaded.
    #[error("Failed to initialize settings: {0}")]
    Settings(#[from] SettingsError),
    /// Library database could not be opened.
    #[error("Failed to initialize library database: {0}")]
    Library(#[from] LibraryError),
    /// User interface could not be set up.
    #[error(transparent)]
    Ui(#[from] UiError),
}

/// Operational error context propagation with `anyhow`.
pub type Result<T> = StdResult<T, Error>;
