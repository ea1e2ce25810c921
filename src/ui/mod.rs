//! GNOME HIG-compliant user interface built with Libadwaita.
//!
//! The album view is split in two layers. The toolkit-independent layer
//! (`layout`, `fields`, `selection`, `drag`, `presentation`) decides what to
//! show; the GTK layer (`components`, `views`, `application`) shows it.

pub mod application;
pub mod components;
pub mod drag;
pub mod fields;
pub mod layout;
pub mod presentation;
pub mod selection;
pub mod utils;
pub mod views;

pub use {
    application::AlbumViewApplication,
    components::{AlbumContextMenu, GtkDragTransport},
    drag::{DragItem, RowDragAdapter},
    fields::{AlbumField, CandidateFields, Column, FieldDescriptor, FieldResolver},
    layout::{LayoutMode, ViewportClass, select_layout},
    presentation::{AlbumPresenter, RenderPlan},
    selection::{AllFields, FieldSelection, SettingsFieldSelection},
    views::AlbumTableView,
};
