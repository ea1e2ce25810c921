//! Album rows as drag sources.
//!
//! A [`RowDragAdapter`] belongs to one table row. When a drag gesture starts
//! it builds a fresh [`DragItem`] naming exactly that row's album; when the
//! gesture ends, dropped or cancelled, it returns to idle and the payload is
//! gone. The toolkit mechanism that carries the item to a drop target is
//! injected through [`DragTransport`].

use std::{cell::Cell, rc::Rc};

use {
    serde::{Deserialize, Serialize},
    serde_json::{Error as SerdeJsonError, from_str, to_string},
    thiserror::Error,
    tracing::debug,
};

use crate::library::Album;

/// Error type for reading a drag payload on the drop side.
#[derive(Error, Debug)]
pub enum DragError {
    /// The transferred text is not a drag item.
    #[error("Malformed drag payload: {0}")]
    Malformed(#[from] SerdeJsonError),
    /// The item is well-formed but carries no albums.
    #[error("Drag payload carries no album ids")]
    Empty,
}

/// Discriminator drop targets match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragType {
    #[serde(rename = "ALBUM")]
    Album,
}

/// Effect the source allows the drop target to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropEffect {
    /// The target receives a reference; the source is untouched.
    Copy,
}

/// Records carried by a drag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    pub album_ids: Vec<i64>,
}

/// Everything handed to the transport when a drag starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragItem {
    #[serde(rename = "type")]
    pub drag_type: DragType,
    pub item: DragPayload,
    pub drop_effect: DropEffect,
}

impl DragItem {
    /// Item for dragging a single album.
    #[must_use]
    pub fn album(album_id: i64) -> Self {
        Self {
            drag_type: DragType::Album,
            item: DragPayload {
                album_ids: vec![album_id],
            },
            drop_effect: DropEffect::Copy,
        }
    }

    /// Serializes the item for a text-based transport.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, SerdeJsonError> {
        to_string(self)
    }

    /// Parses an item received by a drop target.
    ///
    /// # Errors
    ///
    /// Returns `DragError::Malformed` for text that is not a drag item and
    /// `DragError::Empty` for an item without album ids.
    pub fn parse(text: &str) -> Result<Self, DragError> {
        let item: Self = from_str(text)?;
        if item.item.album_ids.is_empty() {
            return Err(DragError::Empty);
        }
        Ok(item)
    }
}

/// Per-row drag lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// How a gesture finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragOutcome {
    Dropped,
    Cancelled,
}

/// Drag source state for one album row.
#[derive(Debug)]
pub struct RowDragAdapter {
    album_id: Cell<i64>,
    state: Cell<DragState>,
}

impl RowDragAdapter {
    #[must_use]
    pub fn new(album: &Album) -> Rc<Self> {
        Rc::new(Self {
            album_id: Cell::new(album.id),
            state: Cell::new(DragState::Idle),
        })
    }

    /// Points the adapter at a new record when the row is reused.
    pub fn set_album(&self, album: &Album) {
        self.album_id.set(album.id);
    }

    #[must_use]
    pub fn album_id(&self) -> i64 {
        self.album_id.get()
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state.get()
    }

    /// Starts a gesture and builds its item.
    ///
    /// The item always names this row's album alone, whatever else is
    /// selected in the view.
    pub fn begin_drag(&self) -> DragItem {
        let album_id = self.album_id.get();
        debug!(album_id, "Album drag started");
        self.state.set(DragState::Dragging);
        DragItem::album(album_id)
    }

    /// Ends the current gesture. Calling it while idle has no effect.
    pub fn end_drag(&self, outcome: DragOutcome) {
        if self.state.replace(DragState::Idle) == DragState::Dragging {
            debug!(album_id = self.album_id.get(), ?outcome, "Album drag ended");
        }
    }

    /// Registers this adapter with a transport as the drag source of `target`.
    pub fn attach<T: DragTransport>(self: &Rc<Self>, transport: &T, target: &T::Target) {
        transport.register_source(target, Rc::clone(self));
    }
}

/// Toolkit capability that turns a widget into a drag source.
///
/// Implementations call [`RowDragAdapter::begin_drag`] when the gesture
/// starts and [`RowDragAdapter::end_drag`] when it finishes.
pub trait DragTransport {
    /// Widget type the transport attaches to.
    type Target;

    fn register_source(&self, target: &Self::Target, adapter: Rc<RowDragAdapter>);
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use serde_json::{Value, from_str, json};

    use crate::{
        library::Album,
        ui::drag::{
            DragError, DragItem, DragOutcome, DragState, DragTransport, DragType, DropEffect,
            RowDragAdapter,
        },
    };

    /// Transport that keeps registered adapters so tests can drive gestures.
    #[derive(Default)]
    struct RecordingTransport {
        sources: RefCell<Vec<(usize, Rc<RowDragAdapter>)>>,
    }

    impl RecordingTransport {
        fn start(&self, row: usize) -> DragItem {
            let sources = self.sources.borrow();
            let (_, adapter) = sources.iter().find(|(r, _)| *r == row).unwrap();
            adapter.begin_drag()
        }

        fn finish(&self, row: usize, outcome: DragOutcome) {
            let sources = self.sources.borrow();
            let (_, adapter) = sources.iter().find(|(r, _)| *r == row).unwrap();
            adapter.end_drag(outcome);
        }
    }

    impl DragTransport for RecordingTransport {
        type Target = usize;

        fn register_source(&self, target: &usize, adapter: Rc<RowDragAdapter>) {
            self.sources.borrow_mut().push((*target, adapter));
        }
    }

    fn album(id: i64) -> Album {
        Album {
            id,
            name: format!("Album {id}"),
            rating: 3,
            ..Album::default()
        }
    }

    #[test]
    fn test_drag_item_wire_format() {
        let value: Value = from_str(&DragItem::album(42).to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({"type": "ALBUM", "item": {"albumIds": [42]}, "dropEffect": "copy"})
        );
    }

    #[test]
    fn test_drag_row_42_scenario() {
        let transport = RecordingTransport::default();
        let record = album(42);
        let before = record.clone();
        let adapter = RowDragAdapter::new(&record);
        adapter.attach(&transport, &0);

        assert_eq!(adapter.state(), DragState::Idle);
        let item = transport.start(0);
        assert_eq!(item.drag_type, DragType::Album);
        assert_eq!(item.item.album_ids, [42]);
        assert_eq!(item.drop_effect, DropEffect::Copy);
        assert_eq!(adapter.state(), DragState::Dragging);

        transport.finish(0, DragOutcome::Cancelled);
        assert_eq!(adapter.state(), DragState::Idle);
        assert_eq!(record, before);
    }

    #[test]
    fn test_payload_is_single_record_among_many_rows() {
        let transport = RecordingTransport::default();
        let adapters: Vec<_> = (1..=20)
            .map(|id| {
                let adapter = RowDragAdapter::new(&album(id));
                adapter.attach(&transport, &usize::try_from(id).unwrap());
                adapter
            })
            .collect();

        let item = transport.start(7);
        assert_eq!(item.item.album_ids, [7]);
        let dragging = adapters
            .iter()
            .filter(|adapter| adapter.state() == DragState::Dragging)
            .count();
        assert_eq!(dragging, 1);
    }

    #[test]
    fn test_concurrent_rows_are_independent() {
        let first = RowDragAdapter::new(&album(1));
        let second = RowDragAdapter::new(&album(2));

        first.begin_drag();
        second.begin_drag();
        first.end_drag(DragOutcome::Dropped);

        assert_eq!(first.state(), DragState::Idle);
        assert_eq!(second.state(), DragState::Dragging);
    }

    #[test]
    fn test_adapter_follows_record_changes() {
        let adapter = RowDragAdapter::new(&album(1));
        adapter.set_album(&album(9));
        assert_eq!(adapter.begin_drag().item.album_ids, [9]);
    }

    #[test]
    fn test_end_drag_when_idle_is_noop() {
        let adapter = RowDragAdapter::new(&album(1));
        adapter.end_drag(DragOutcome::Dropped);
        assert_eq!(adapter.state(), DragState::Idle);
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        assert!(matches!(
            DragItem::parse("not json"),
            Err(DragError::Malformed(_))
        ));
        assert!(matches!(
            DragItem::parse(r#"{"type":"ALBUM","item":{"albumIds":[]},"dropEffect":"copy"}"#),
            Err(DragError::Empty)
        ));
        assert!(matches!(
            DragItem::parse(r#"{"type":"SONG","item":{"albumIds":[1]},"dropEffect":"copy"}"#),
            Err(DragError::Malformed(_))
        ));

        let parsed = DragItem::parse(&DragItem::album(5).to_json().unwrap()).unwrap();
        assert_eq!(parsed, DragItem::album(5));
    }
}
