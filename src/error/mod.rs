//! Error handling built on `thiserror` and `anyhow`.
//!
//! This module provides domain-specific error types for precise handling and
//! operational context propagation for rich debugging information.

pub mod domain;
pub mod operational;

pub use {
    domain::{AppError, UiError},
    operational::{ErrorReporter, ResultExt},
};
