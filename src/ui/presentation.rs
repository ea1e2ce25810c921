//! Toolkit-independent render plan for the album view.
//!
//! [`AlbumPresenter`] composes the layout selector, the field resolver, and
//! the selection service into a [`RenderPlan`] for one render pass. The GTK
//! view only turns that plan into widgets.

use std::sync::Arc;

use crate::{
    config::FeatureConfig,
    library::Album,
    ui::{
        fields::{
            ALBUM_RESOURCE, CandidateFields, Column, FieldResolver, ResolverInputs, table_columns,
        },
        layout::{LayoutMode, ViewportClass, select_layout},
        selection::FieldSelection,
        utils::format_year_range,
    },
};

/// Text content of one compact-mode entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactRow {
    /// Album name.
    pub primary: String,
    /// Album artist.
    pub secondary: String,
    /// Inline rating, present only when star rating is enabled.
    pub rating: Option<i64>,
    /// Year range.
    pub tertiary: String,
}

/// Compact presentation settings shared by every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactPlan {
    pub show_rating: bool,
}

impl CompactPlan {
    #[must_use]
    pub fn row(&self, album: &Album) -> CompactRow {
        CompactRow {
            primary: album.name.clone(),
            secondary: album.display_album_artist().to_string(),
            rating: self.show_rating.then_some(album.rating),
            tertiary: format_year_range(album),
        }
    }
}

/// Table presentation: the ordered columns to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePlan {
    pub columns: Vec<Column>,
}

impl TablePlan {
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        self.columns.iter().map(Column::key).collect()
    }
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPlan {
    Compact(CompactPlan),
    Table(TablePlan),
}

impl RenderPlan {
    #[must_use]
    pub fn mode(&self) -> LayoutMode {
        match self {
            Self::Compact(_) => LayoutMode::Compact,
            Self::Table(_) => LayoutMode::Table,
        }
    }
}

/// Decides, per render, how albums are presented.
#[derive(Debug)]
pub struct AlbumPresenter<S> {
    features: FeatureConfig,
    resolver: FieldResolver,
    selection: S,
}

impl<S: FieldSelection> AlbumPresenter<S> {
    /// Creates a presenter with features fixed for its lifetime.
    #[must_use]
    pub fn new(features: FeatureConfig, selection: S) -> Self {
        Self {
            features,
            resolver: FieldResolver::new(),
            selection,
        }
    }

    #[must_use]
    pub fn features(&self) -> FeatureConfig {
        self.features
    }

    /// Candidate optional fields for `viewport`, memoized across renders.
    pub fn candidates(&self, viewport: ViewportClass) -> Arc<CandidateFields> {
        self.resolver
            .resolve(ResolverInputs::new(viewport, self.features))
    }

    /// Builds the plan for the current viewport.
    pub fn plan(&self, viewport: ViewportClass) -> RenderPlan {
        match select_layout(viewport) {
            LayoutMode::Compact => RenderPlan::Compact(CompactPlan {
                show_rating: self.features.enable_star_rating,
            }),
            LayoutMode::Table => {
                let candidates = self.candidates(viewport);
                let selected = self.selection.select(ALBUM_RESOURCE, &candidates);
                RenderPlan::Table(TablePlan {
                    columns: table_columns(&selected, self.features),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, sync::Arc};

    use crate::{
        config::FeatureConfig,
        library::Album,
        ui::{
            fields::{CandidateFields, Column, FieldDescriptor},
            layout::{
                LayoutMode,
                ViewportClass::{Desktop, ExtraSmall, Other},
            },
            presentation::{AlbumPresenter, CompactRow, RenderPlan},
            selection::{AllFields, FieldSelection},
        },
    };

    fn features(enable_star_rating: bool, enable_favourites: bool) -> FeatureConfig {
        FeatureConfig {
            enable_star_rating,
            enable_favourites,
        }
    }

    fn table_keys(plan: &RenderPlan) -> Vec<&'static str> {
        match plan {
            RenderPlan::Table(table) => table.keys(),
            RenderPlan::Compact(_) => panic!("expected table mode"),
        }
    }

    /// Selection that records the candidate keys it was offered.
    #[derive(Default)]
    struct Spy {
        offered: RefCell<Vec<Vec<&'static str>>>,
    }

    impl FieldSelection for Spy {
        fn select(&self, _resource: &str, candidates: &CandidateFields) -> Vec<FieldDescriptor> {
            self.offered.borrow_mut().push(candidates.keys());
            candidates.iter().rev().copied().collect()
        }
    }

    #[test]
    fn test_desktop_with_all_features() {
        let presenter = AlbumPresenter::new(features(true, true), AllFields);
        let plan = presenter.plan(Desktop);
        assert_eq!(plan.mode(), LayoutMode::Table);
        assert_eq!(
            table_keys(&plan),
            [
                "name",
                "artist",
                "songCount",
                "playCount",
                "year",
                "duration",
                "rating",
                "actions"
            ]
        );

        let RenderPlan::Table(table) = plan else {
            unreachable!()
        };
        let Some(Column::Actions(actions)) = table.columns.last() else {
            panic!("actions column missing");
        };
        assert!(actions.show_favourite_icon);
    }

    #[test]
    fn test_desktop_without_star_rating() {
        let presenter = AlbumPresenter::new(features(false, true), AllFields);
        assert_eq!(
            table_keys(&presenter.plan(Desktop)),
            [
                "name",
                "artist",
                "songCount",
                "playCount",
                "year",
                "duration",
                "actions"
            ]
        );
    }

    #[test]
    fn test_medium_viewport_uses_table_without_desktop_fields() {
        let presenter = AlbumPresenter::new(features(true, true), AllFields);
        assert_eq!(
            table_keys(&presenter.plan(Other)),
            ["name", "artist", "year", "rating", "actions"]
        );
    }

    #[test]
    fn test_extra_small_uses_compact_rows() {
        let presenter = AlbumPresenter::new(features(true, true), AllFields);
        let RenderPlan::Compact(compact) = presenter.plan(ExtraSmall) else {
            panic!("expected compact mode");
        };

        let album = Album {
            id: 1,
            name: "Blue Train".to_string(),
            artist: "John Coltrane".to_string(),
            album_artist: "John Coltrane".to_string(),
            min_year: 1957,
            max_year: 1958,
            rating: 4,
            ..Album::default()
        };
        assert_eq!(
            compact.row(&album),
            CompactRow {
                primary: "Blue Train".to_string(),
                secondary: "John Coltrane".to_string(),
                rating: Some(4),
                tertiary: "1957-1958".to_string(),
            }
        );
    }

    #[test]
    fn test_compact_rows_hide_rating_when_disabled() {
        let presenter = AlbumPresenter::new(features(false, true), AllFields);
        let RenderPlan::Compact(compact) = presenter.plan(ExtraSmall) else {
            panic!("expected compact mode");
        };
        assert_eq!(compact.row(&Album::default()).rating, None);
    }

    #[test]
    fn test_selection_output_is_authoritative() {
        let presenter = AlbumPresenter::new(features(true, true), Spy::default());
        let keys = table_keys(&presenter.plan(Other));
        assert_eq!(keys, ["name", "rating", "year", "artist", "actions"]);
        assert_eq!(
            presenter.selection.offered.borrow().as_slice(),
            [vec!["artist", "year", "rating"]]
        );
    }

    #[test]
    fn test_compact_mode_skips_selection_service() {
        let presenter = AlbumPresenter::new(features(true, true), Spy::default());
        presenter.plan(ExtraSmall);
        assert!(presenter.selection.offered.borrow().is_empty());
    }

    #[test]
    fn test_repeated_renders_are_identical_and_stable() {
        let presenter = AlbumPresenter::new(features(true, false), AllFields);
        assert_eq!(presenter.plan(Desktop), presenter.plan(Desktop));
        assert!(Arc::ptr_eq(
            &presenter.candidates(Desktop),
            &presenter.candidates(Desktop)
        ));
    }
}
