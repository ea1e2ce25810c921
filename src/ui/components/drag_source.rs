//! GTK drag-and-drop transport for album rows.
//!
//! Album drag items travel as JSON text in a `ContentProvider`, so any drop
//! target accepting strings can read them back with [`DragItem::parse`].

use std::rc::Rc;

use {
    libadwaita::{
        glib::Type,
        gtk::{
            DragSource, DropTarget, Widget,
            gdk::{ContentProvider, DragAction},
        },
        prelude::{ToValue, WidgetExt},
    },
    tracing::warn,
};

use crate::ui::drag::{
    DragItem,
    DragOutcome::{Cancelled, Dropped},
    DragTransport, RowDragAdapter,
};

/// Registers widgets as copy-only drag sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct GtkDragTransport;

impl DragTransport for GtkDragTransport {
    type Target = Widget;

    fn register_source(&self, target: &Widget, adapter: Rc<RowDragAdapter>) {
        let source = DragSource::builder().actions(DragAction::COPY).build();

        source.connect_prepare({
            let adapter = Rc::clone(&adapter);
            move |_, _, _| {
                let item = adapter.begin_drag();
                match item.to_json() {
                    Ok(json) => Some(ContentProvider::for_value(&json.to_value())),
                    Err(error) => {
                        warn!(%error, album_id = adapter.album_id(), "Cannot encode drag item");
                        adapter.end_drag(Cancelled);
                        None
                    }
                }
            }
        });

        // A cancel is always followed by drag-end, which then finds the
        // adapter idle and does nothing.
        source.connect_drag_cancel({
            let adapter = Rc::clone(&adapter);
            move |_, _, _| {
                adapter.end_drag(Cancelled);
                false
            }
        });

        source.connect_drag_end(move |_, _, _| adapter.end_drag(Dropped));

        target.add_controller(source);
    }
}

/// Creates a drop target accepting album drag items.
///
/// Text that does not parse as an album item is refused and logged.
pub fn album_drop_target<F>(on_drop: F) -> DropTarget
where
    F: Fn(DragItem) + 'static,
{
    let target = DropTarget::new(Type::STRING, DragAction::COPY);
    target.connect_drop(move |_, value, _, _| {
        let Ok(text) = value.get::<String>() else {
            return false;
        };
        match DragItem::parse(&text) {
            Ok(item) => {
                on_drop(item);
                true
            }
            Err(error) => {
                warn!(%error, "Rejected drop");
                false
            }
        }
    });
    target
}

