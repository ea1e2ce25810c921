//! Album views.
//!
//! This module provides the responsive album view that switches between a
//! compact list for narrow windows and a sortable, column-configurable table.

#[cfg(test)]
mod tests;

pub mod album_table;

pub use album_table::{AlbumTableView, AlbumTableViewBuilder};
