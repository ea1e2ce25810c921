//! Album library data provider.
//!
//! This module supplies the album records shown by the views, including
//! database operations, data models, sort keys, and schema management.

pub mod database;
pub mod models;
pub mod schema;
pub mod sort;
pub mod worker;

pub use {
    database::{LibraryDatabase, LibraryError, MAX_RATING},
    models::Album,
    schema::{CURRENT_SCHEMA_VERSION, SchemaManager, create_connection_pool, get_database_path},
    sort::{AlbumSort, SortKey, SortOrder},
    worker::{LibraryCommand, LibraryWorker},
};
