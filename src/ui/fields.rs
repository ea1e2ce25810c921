//! Album column declarations and the field visibility resolver.
//!
//! Optional album fields are declared once, as [`AlbumField`] variants, each
//! with a renderer, a default sort, and an enablement predicate over the
//! viewport and the feature flags. [`FieldResolver`] evaluates the
//! predicates into an ordered [`CandidateFields`] list, which the
//! user-selection service then narrows to the columns actually shown.
//!
//! The leading name column and the trailing actions column are not optional
//! and never pass through the selection service; see [`table_columns`].

use std::sync::Arc;

use {parking_lot::Mutex, tracing::debug};

use crate::{
    config::FeatureConfig,
    library::{
        Album, AlbumSort, SortKey,
        SortOrder::{Asc, Desc},
    },
    ui::{
        layout::ViewportClass,
        utils::{format_duration, format_rating, format_year_range},
    },
};

/// Resource name the album columns are stored under in the preference store.
pub const ALBUM_RESOURCE: &str = "album";

/// How a field's value is turned into cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRenderer {
    /// Plain text.
    Text,
    /// Integer count.
    Number,
    /// Seconds formatted as a clock duration.
    Duration,
    /// Min/max year range.
    Range,
    /// Artist name linking to the artist.
    ArtistLink,
    /// Star rating.
    Rating,
}

/// An optional album column.
///
/// The declaration order of [`AlbumField::ALL`] is the default column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlbumField {
    Artist,
    SongCount,
    PlayCount,
    Year,
    Duration,
    Rating,
}

impl AlbumField {
    /// All optional fields in default display order.
    pub const ALL: [AlbumField; 6] = [
        AlbumField::Artist,
        AlbumField::SongCount,
        AlbumField::PlayCount,
        AlbumField::Year,
        AlbumField::Duration,
        AlbumField::Rating,
    ];

    /// Key used by the preference store.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::SongCount => "songCount",
            Self::PlayCount => "playCount",
            Self::Year => "year",
            Self::Duration => "duration",
            Self::Rating => "rating",
        }
    }

    /// Looks a field up by its preference-store key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Column header text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Artist => "Artist",
            Self::SongCount => "Songs",
            Self::PlayCount => "Plays",
            Self::Year => "Year",
            Self::Duration => "Duration",
            Self::Rating => "Rating",
        }
    }

    #[must_use]
    pub fn renderer(self) -> FieldRenderer {
        match self {
            Self::Artist => FieldRenderer::ArtistLink,
            Self::SongCount | Self::PlayCount => FieldRenderer::Number,
            Self::Year => FieldRenderer::Range,
            Self::Duration => FieldRenderer::Duration,
            Self::Rating => FieldRenderer::Rating,
        }
    }

    /// Sort applied the first time this column's header is clicked.
    #[must_use]
    pub fn default_sort(self) -> AlbumSort {
        match self {
            Self::Artist => AlbumSort::new(SortKey::Artist, Asc),
            Self::SongCount => AlbumSort::new(SortKey::SongCount, Desc),
            Self::PlayCount => AlbumSort::new(SortKey::PlayCount, Desc),
            Self::Year => AlbumSort::new(SortKey::MaxYear, Desc),
            Self::Duration => AlbumSort::new(SortKey::Duration, Asc),
            Self::Rating => AlbumSort::new(SortKey::Rating, Desc),
        }
    }

    /// Whether the field may be offered at all for these inputs.
    #[must_use]
    pub fn is_enabled(self, inputs: ResolverInputs) -> bool {
        match self {
            Self::Artist | Self::Year => true,
            Self::SongCount | Self::PlayCount | Self::Duration => inputs.is_desktop,
            Self::Rating => inputs.enable_star_rating,
        }
    }
}

/// A resolved optional column: which field, how to render it, how it sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub field: AlbumField,
    pub renderer: FieldRenderer,
    pub sort: AlbumSort,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(field: AlbumField) -> Self {
        Self {
            field,
            renderer: field.renderer(),
            sort: field.default_sort(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        self.field.key()
    }

    /// Text content of this column's cell for `album`.
    #[must_use]
    pub fn render_text(&self, album: &Album) -> String {
        match self.field {
            AlbumField::Artist => album.artist.clone(),
            AlbumField::SongCount => album.song_count.to_string(),
            AlbumField::PlayCount => album.play_count.to_string(),
            AlbumField::Year => format_year_range(album),
            AlbumField::Duration => format_duration(album.duration),
            AlbumField::Rating => format_rating(album.rating),
        }
    }
}

/// Inputs the candidate set depends on.
///
/// Two renders with equal inputs receive the same [`CandidateFields`]
/// allocation from [`FieldResolver::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolverInputs {
    pub is_desktop: bool,
    pub enable_star_rating: bool,
}

impl ResolverInputs {
    #[must_use]
    pub fn new(viewport: ViewportClass, features: FeatureConfig) -> Self {
        Self {
            is_desktop: viewport.is_desktop(),
            enable_star_rating: features.enable_star_rating,
        }
    }
}

/// Ordered set of fields the user may choose from.
///
/// Disabled fields are absent rather than flagged, so the selection service
/// never offers a toggle for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFields {
    fields: Vec<FieldDescriptor>,
}

impl CandidateFields {
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(FieldDescriptor::key).collect()
    }

    #[must_use]
    pub fn contains(&self, field: AlbumField) -> bool {
        self.fields.iter().any(|descriptor| descriptor.field == field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateFields {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Evaluates every enablement predicate, keeping declaration order.
#[must_use]
pub fn candidate_fields(inputs: ResolverInputs) -> CandidateFields {
    CandidateFields {
        fields: AlbumField::ALL
            .into_iter()
            .filter(|field| field.is_enabled(inputs))
            .map(FieldDescriptor::new)
            .collect(),
    }
}

/// Memoizing wrapper around [`candidate_fields`].
///
/// Recomputes only when the inputs differ from the previous call.
#[derive(Debug, Default)]
pub struct FieldResolver {
    cache: Mutex<Option<(ResolverInputs, Arc<CandidateFields>)>>,
}

impl FieldResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the candidate set for `inputs`, reusing the cached one if unchanged.
    pub fn resolve(&self, inputs: ResolverInputs) -> Arc<CandidateFields> {
        let mut cache = self.cache.lock();
        if let Some((cached_inputs, candidates)) = cache.as_ref()
            && *cached_inputs == inputs
        {
            return Arc::clone(candidates);
        }

        let candidates = Arc::new(candidate_fields(inputs));
        debug!(
            is_desktop = inputs.is_desktop,
            enable_star_rating = inputs.enable_star_rating,
            fields = ?candidates.keys(),
            "Recomputed album field candidates"
        );
        *cache = Some((inputs, Arc::clone(&candidates)));
        candidates
    }
}

/// Trailing column hosting the per-album context menu and favourite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionsColumn {
    /// Sort used when the header is clicked.
    pub sort: AlbumSort,
    /// Whether the header can be clicked to sort by favourite.
    pub sortable: bool,
    /// Whether the header shows the favourite icon.
    pub show_favourite_icon: bool,
}

impl ActionsColumn {
    #[must_use]
    pub fn new(features: FeatureConfig) -> Self {
        Self {
            sort: AlbumSort::new(SortKey::Starred, Desc),
            sortable: features.enable_favourites,
            show_favourite_icon: features.enable_favourites,
        }
    }
}

/// One column of the album table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Fixed leading album name.
    Name,
    /// User-selectable field.
    Field(FieldDescriptor),
    /// Fixed trailing actions.
    Actions(ActionsColumn),
}

impl Column {
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Field(descriptor) => descriptor.key(),
            Self::Actions(_) => "actions",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Field(descriptor) => descriptor.field.label(),
            Self::Actions(_) => "",
        }
    }

    /// Renderer for the column's cells; the actions column hosts widgets instead.
    #[must_use]
    pub fn renderer(&self) -> Option<FieldRenderer> {
        match self {
            Self::Name => Some(FieldRenderer::Text),
            Self::Field(descriptor) => Some(descriptor.renderer),
            Self::Actions(_) => None,
        }
    }

    /// Sort requested by clicking this column's header, if it is sortable.
    #[must_use]
    pub fn sort(&self) -> Option<AlbumSort> {
        match self {
            Self::Name => Some(AlbumSort::new(SortKey::Name, Asc)),
            Self::Field(descriptor) => Some(descriptor.sort),
            Self::Actions(actions) => actions.sortable.then_some(actions.sort),
        }
    }
}

/// Assembles the full table: name, the selected fields in order, actions.
#[must_use]
pub fn table_columns(selected: &[FieldDescriptor], features: FeatureConfig) -> Vec<Column> {
    let mut columns = Vec::with_capacity(selected.len() + 2);
    columns.push(Column::Name);
    columns.extend(selected.iter().copied().map(Column::Field));
    columns.push(Column::Actions(ActionsColumn::new(features)));
    columns
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        config::FeatureConfig,
        library::{
            Album, AlbumSort,
            SortKey::{MaxYear, PlayCount, Starred},
            SortOrder::Desc,
        },
        ui::{
            fields::{
                AlbumField, Column, FieldDescriptor, FieldRenderer, FieldResolver,
                ResolverInputs, candidate_fields, table_columns,
            },
            layout::ViewportClass::{Desktop, ExtraSmall, Other},
        },
    };

    fn inputs(is_desktop: bool, enable_star_rating: bool) -> ResolverInputs {
        ResolverInputs {
            is_desktop,
            enable_star_rating,
        }
    }

    #[test]
    fn test_candidate_order_on_desktop() {
        let candidates = candidate_fields(inputs(true, true));
        assert_eq!(
            candidates.keys(),
            ["artist", "songCount", "playCount", "year", "duration", "rating"]
        );
    }

    #[test]
    fn test_desktop_only_fields_absent_elsewhere() {
        for star_rating in [true, false] {
            let candidates = candidate_fields(inputs(false, star_rating));
            for field in [AlbumField::SongCount, AlbumField::PlayCount, AlbumField::Duration] {
                assert!(!candidates.contains(field), "{field:?} offered off desktop");
            }
            assert!(candidates.contains(AlbumField::Artist));
            assert!(candidates.contains(AlbumField::Year));
        }
    }

    #[test]
    fn test_rating_gated_by_feature_flag() {
        for is_desktop in [true, false] {
            assert!(!candidate_fields(inputs(is_desktop, false)).contains(AlbumField::Rating));
            assert!(candidate_fields(inputs(is_desktop, true)).contains(AlbumField::Rating));
        }
    }

    #[test]
    fn test_every_enabled_field_is_surfaced() {
        for is_desktop in [true, false] {
            for star_rating in [true, false] {
                let resolved = inputs(is_desktop, star_rating);
                let candidates = candidate_fields(resolved);
                let expected: Vec<_> = AlbumField::ALL
                    .into_iter()
                    .filter(|field| field.is_enabled(resolved))
                    .map(AlbumField::key)
                    .collect();
                assert_eq!(candidates.keys(), expected);
            }
        }
    }

    #[test]
    fn test_resolver_inputs_from_viewport() {
        let features = FeatureConfig::default();
        assert!(ResolverInputs::new(Desktop, features).is_desktop);
        assert!(!ResolverInputs::new(Other, features).is_desktop);
        assert!(!ResolverInputs::new(ExtraSmall, features).is_desktop);
    }

    #[test]
    fn test_resolver_is_referentially_stable() {
        let resolver = FieldResolver::new();
        let first = resolver.resolve(inputs(true, true));
        let second = resolver.resolve(inputs(true, true));
        assert!(Arc::ptr_eq(&first, &second));

        let changed = resolver.resolve(inputs(false, true));
        assert!(!Arc::ptr_eq(&first, &changed));

        let back = resolver.resolve(inputs(false, true));
        assert!(Arc::ptr_eq(&changed, &back));
    }

    #[test]
    fn test_sort_metadata() {
        let year = FieldDescriptor::new(AlbumField::Year);
        assert_eq!(year.renderer, FieldRenderer::Range);
        assert_eq!(year.sort, AlbumSort::new(MaxYear, Desc));

        let plays = FieldDescriptor::new(AlbumField::PlayCount);
        assert_eq!(plays.renderer, FieldRenderer::Number);
        assert_eq!(plays.sort, AlbumSort::new(PlayCount, Desc));
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in AlbumField::ALL {
            assert_eq!(AlbumField::from_key(field.key()), Some(field));
        }
        assert_eq!(AlbumField::from_key("genre"), None);
    }

    #[test]
    fn test_render_text() {
        let album = Album {
            artist: "Nina Simone".to_string(),
            song_count: 10,
            play_count: 3,
            duration: 2400.0,
            min_year: 1965,
            max_year: 1965,
            rating: 4,
            ..Album::default()
        };
        let render = |field| FieldDescriptor::new(field).render_text(&album);
        assert_eq!(render(AlbumField::Artist), "Nina Simone");
        assert_eq!(render(AlbumField::SongCount), "10");
        assert_eq!(render(AlbumField::PlayCount), "3");
        assert_eq!(render(AlbumField::Year), "1965");
        assert_eq!(render(AlbumField::Duration), "40:00");
        assert_eq!(render(AlbumField::Rating), "★★★★☆");
    }

    #[test]
    fn test_table_columns_wrap_selection() {
        let features = FeatureConfig::default();
        let selected = [FieldDescriptor::new(AlbumField::Year)];
        let columns = table_columns(&selected, features);
        let keys: Vec<_> = columns.iter().map(Column::key).collect();
        assert_eq!(keys, ["name", "year", "actions"]);

        let Some(Column::Actions(actions)) = columns.last() else {
            panic!("actions column missing");
        };
        assert!(actions.show_favourite_icon);
        assert_eq!(columns.last().and_then(Column::sort), Some(AlbumSort::new(Starred, Desc)));
    }

    #[test]
    fn test_actions_column_without_favourites() {
        let features = FeatureConfig {
            enable_star_rating: true,
            enable_favourites: false,
        };
        let columns = table_columns(&[], features);
        let Some(Column::Actions(actions)) = columns.last() else {
            panic!("actions column missing");
        };
        assert!(!actions.sortable);
        assert!(!actions.show_favourite_icon);
        assert_eq!(columns.last().and_then(Column::sort), None);
    }
}
