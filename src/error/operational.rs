//! Operational error context propagation with `anyhow`.
//!
//! UI callbacks cannot return errors to anyone, so failures inside them are
//! given context with [`ResultExt`] and handed to [`ErrorReporter`].

use std::{error::Error as StdError, fmt::Display};

use {
    anyhow::{Context, Error, Result as AnyhowResult},
    tracing::{debug, error, warn},
};

use crate::library::LibraryError;

/// Extension trait for enhanced error context.
pub trait ResultExt<T, E> {
    /// Adds context to an error with a static string.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with `context`.
    fn add_context(self, context: &'static str) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static;

    /// Adds context to an error with a formatted string.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with `format`.
    fn add_contextf(self, format: impl Display) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn add_context(self, context: &'static str) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.context(context)
    }

    fn add_contextf(self, format: impl Display) -> AnyhowResult<T>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.context(format.to_string())
    }
}

/// Centralized error reporting and logging.
#[derive(Debug)]
pub struct ErrorReporter;

impl ErrorReporter {
    /// Reports a debug-level error.
    pub fn debug(error: &Error, context: &str) {
        debug!(context = context, error = %error, "Debug error");
    }

    /// Reports a recoverable failure.
    pub fn warn(error: &Error, context: &str) {
        warn!(context = context, error = format!("{error:#}"), "Recoverable error");
    }

    /// Reports a non-recoverable failure.
    pub fn error(error: &Error, context: &str) {
        error!(context = context, error = format!("{error:#}"), "Unrecoverable error");
    }

    /// Converts an error to a message suitable for a toast.
    ///
    /// Known library failures get a short explanation; anything else falls
    /// back to the outermost context.
    #[must_use]
    pub fn to_user_message(error: &Error) -> String {
        match error.downcast_ref::<LibraryError>() {
            Some(LibraryError::NotFound { .. }) => {
                "The album is no longer in the library".to_string()
            }
            Some(LibraryError::InvalidData { reason }) => format!("Invalid value: {reason}"),
            _ => error.to_string(),
        }
    }
}
