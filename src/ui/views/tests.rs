//! Integration tests for the album view.
//!
//! These need a display, so they are ignored by default.

#[cfg(test)]
mod view_integration_tests {
    use std::sync::Arc;

    use libadwaita::init;

    use crate::{
        config::FeatureConfig,
        library::Album,
        state::AppState,
        ui::{
            drag::DragState,
            layout::{
                LayoutMode::{Compact, Table},
                ViewportClass::{Desktop, ExtraSmall, Other},
            },
            views::AlbumTableView,
        },
    };

    fn albums() -> Vec<Album> {
        vec![
            Album {
                id: 42,
                name: "Blue Train".to_string(),
                artist: "John Coltrane".to_string(),
                min_year: 1957,
                max_year: 1957,
                ..Album::default()
            },
            Album {
                id: 43,
                name: "Giant Steps".to_string(),
                artist: "John Coltrane".to_string(),
                ..Album::default()
            },
        ]
    }

    #[test]
    #[ignore = "Requires GTK display for UI testing"]
    fn test_view_switches_layout_with_viewport() {
        if init().is_err() {
            return;
        }

        let view = AlbumTableView::builder()
            .features(FeatureConfig::default())
            .build();

        assert_eq!(view.render(&albums(), Desktop), Table);
        assert_eq!(view.visible_mode(), Some(Table));
        assert_eq!(view.row_count(), 2);

        assert_eq!(view.render(&albums(), ExtraSmall), Compact);
        assert_eq!(view.visible_mode(), Some(Compact));
        assert!(view.drag_adapters().is_empty());

        assert_eq!(view.render(&albums(), Other), Table);
    }

    #[test]
    #[ignore = "Requires GTK display for UI testing"]
    fn test_table_rows_get_idle_drag_adapters() {
        if init().is_err() {
            return;
        }

        let view = AlbumTableView::builder().build();
        view.render(&albums(), Desktop);

        let adapters = view.drag_adapters();
        assert_eq!(adapters.len(), 2);
        assert_eq!(adapters[0].album_id(), 42);
        assert!(adapters.iter().all(|a| a.state() == DragState::Idle));

        let item = adapters[0].begin_drag();
        assert_eq!(item.item.album_ids, [42]);
    }

    #[test]
    #[ignore = "Requires GTK display for UI testing"]
    fn test_view_renders_from_app_state() {
        if init().is_err() {
            return;
        }

        let app_state = Arc::new(AppState::new());
        app_state.update_albums(albums(), Default::default());
        app_state.update_viewport(ExtraSmall);

        let view = AlbumTableView::builder().app_state(app_state).build();

        assert_eq!(view.visible_mode(), Some(Compact));
        assert_eq!(view.row_count(), 2);
    }
}
