//! Album table/list view.
//!
//! This module implements the `AlbumTableView` component. Each render pass
//! asks the [`AlbumPresenter`] for a plan and realizes it as one of two
//! pages: a compact list of three-line entries for narrow windows, or a
//! sortable table with user-selected columns and draggable rows.

use std::{cell::RefCell, rc::Rc, sync::Arc};

use {
    libadwaita::{
        glib::{JoinHandle, MainContext},
        gtk::{
            AccessibleRole::List,
            Align::{Center, End as AlignEnd, Start},
            Box as GtkBox, Button, Image, Label, ListBox, ListBoxRow,
            Orientation::{Horizontal, Vertical},
            PolicyType::Never,
            ScrolledWindow,
            SelectionMode::None as SelectionNone,
            Stack, Widget,
            pango::EllipsizeMode::End,
        },
        prelude::{AccessibleExt, BoxExt, ButtonExt, Cast, IsA, ListBoxRowExt, WidgetExt},
    },
    tokio::sync::broadcast::error::RecvError,
    tracing::debug,
};

use crate::{
    config::FeatureConfig,
    library::{
        Album, AlbumSort,
        SortOrder::{Asc, Desc},
    },
    state::{
        AlbumAction, AppState,
        AppStateEvent::{AlbumsChanged, ViewportChanged},
        NavigationIntent::{ShowAlbum, ShowArtist},
    },
    ui::{
        components::{context_menu::AlbumContextMenu, drag_source::GtkDragTransport},
        drag::RowDragAdapter,
        fields::{Column, FieldRenderer},
        layout::{LayoutMode, ViewportClass},
        presentation::{AlbumPresenter, CompactPlan, RenderPlan, TablePlan},
        selection::{AllFields, FieldSelection},
        utils::format_rating,
    },
};

const COMPACT_PAGE: &str = "compact";
const TABLE_PAGE: &str = "table";

/// Builder pattern for configuring `AlbumTableView` components.
#[derive(Default)]
pub struct AlbumTableViewBuilder {
    /// Optional application state reference for reactive updates.
    app_state: Option<Arc<AppState>>,
    /// Features fixed for the lifetime of the view.
    features: FeatureConfig,
    /// Column selection service; every candidate is shown when unset.
    selection: Option<Box<dyn FieldSelection>>,
}

impl AlbumTableViewBuilder {
    /// Sets the application state for reactive updates.
    #[must_use]
    pub fn app_state(mut self, app_state: Arc<AppState>) -> Self {
        self.app_state = Some(app_state);
        self
    }

    /// Sets the feature flags.
    #[must_use]
    pub fn features(mut self, features: FeatureConfig) -> Self {
        self.features = features;
        self
    }

    /// Sets the service choosing the displayed table columns.
    #[must_use]
    pub fn selection<S: FieldSelection + 'static>(mut self, selection: S) -> Self {
        self.selection = Some(Box::new(selection));
        self
    }

    /// Builds the `AlbumTableView` component.
    #[must_use]
    pub fn build(self) -> AlbumTableView {
        let selection = self
            .selection
            .unwrap_or_else(|| Box::new(AllFields) as Box<dyn FieldSelection>);
        AlbumTableView::new(
            self.app_state.as_ref(),
            AlbumPresenter::new(self.features, selection),
        )
    }
}

/// Widgets and render state shared with the subscription task.
struct AlbumTablePages {
    stack: Stack,
    compact_list: ListBox,
    table_header: GtkBox,
    table_list: ListBox,
    presenter: AlbumPresenter<Box<dyn FieldSelection>>,
    app_state: Option<Arc<AppState>>,
    /// Album ids in row order, shared with the row-activation handlers.
    row_album_ids: Rc<RefCell<Vec<i64>>>,
    /// Drag adapters of the current table rows.
    drag_adapters: RefCell<Vec<Rc<RowDragAdapter>>>,
}

/// Album view switching between compact entries and a sortable table.
pub struct AlbumTableView {
    /// The underlying GTK widget (`Stack`).
    pub widget: Widget,
    pages: Rc<AlbumTablePages>,
    /// State subscription handle for cleanup.
    _subscription_handle: Option<JoinHandle<()>>,
}

impl AlbumTableView {
    /// Creates a new `AlbumTableView` and renders the current state.
    #[must_use]
    pub fn new(
        app_state: Option<&Arc<AppState>>,
        presenter: AlbumPresenter<Box<dyn FieldSelection>>,
    ) -> Self {
        let compact_list = album_list_box();
        let table_list = album_list_box();
        let table_header = GtkBox::builder()
            .orientation(Horizontal)
            .spacing(12)
            .margin_start(8)
            .margin_end(8)
            .css_classes(["album-table-header"])
            .build();

        let table_page = GtkBox::builder().orientation(Vertical).build();
        table_page.append(&table_header);
        table_page.append(&scrolled(&table_list));

        let stack = Stack::builder().hhomogeneous(false).vhomogeneous(false).build();
        stack.add_named(&scrolled(&compact_list), Some(COMPACT_PAGE));
        stack.add_named(&table_page, Some(TABLE_PAGE));

        let row_album_ids = Rc::new(RefCell::new(Vec::new()));
        if let Some(state) = app_state {
            for list in [&compact_list, &table_list] {
                let ids = Rc::clone(&row_album_ids);
                let state = Arc::clone(state);
                list.connect_row_activated(move |_, row| {
                    let id = usize::try_from(row.index())
                        .ok()
                        .and_then(|index| ids.borrow().get(index).copied());
                    if let Some(id) = id {
                        state.request_navigation(ShowAlbum(id));
                    }
                });
            }
        }

        let pages = Rc::new(AlbumTablePages {
            stack: stack.clone(),
            compact_list,
            table_header,
            table_list,
            presenter,
            app_state: app_state.cloned(),
            row_album_ids,
            drag_adapters: RefCell::new(Vec::new()),
        });

        let subscription_handle = app_state.map(|state| {
            let state = Arc::clone(state);
            let pages = Rc::clone(&pages);
            MainContext::default().spawn_local(async move {
                let mut rx = state.subscribe();
                loop {
                    match rx.recv().await {
                        Ok(ViewportChanged(_) | AlbumsChanged) => pages.refresh(),
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Album view lagged behind state events");
                            pages.refresh();
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        });

        pages.refresh();

        Self {
            widget: stack.upcast(),
            pages,
            _subscription_handle: subscription_handle,
        }
    }

    /// Creates an `AlbumTableView` builder for configuration.
    #[must_use]
    pub fn builder() -> AlbumTableViewBuilder {
        AlbumTableViewBuilder::default()
    }

    /// Renders `albums` for `viewport` and returns the mode used.
    pub fn render(&self, albums: &[Album], viewport: ViewportClass) -> LayoutMode {
        self.pages.render(albums, viewport)
    }

    /// Layout currently on screen.
    #[must_use]
    pub fn visible_mode(&self) -> Option<LayoutMode> {
        match self.pages.stack.visible_child_name()?.as_str() {
            COMPACT_PAGE => Some(LayoutMode::Compact),
            TABLE_PAGE => Some(LayoutMode::Table),
            _ => None,
        }
    }

    /// Number of rows in the visible page.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.pages.row_album_ids.borrow().len()
    }

    /// Drag adapters of the rendered table rows, in row order.
    #[must_use]
    pub fn drag_adapters(&self) -> Vec<Rc<RowDragAdapter>> {
        self.pages.drag_adapters.borrow().clone()
    }
}

impl Default for AlbumTableView {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AlbumTablePages {
    /// Re-renders from the current application state.
    fn refresh(&self) {
        if let Some(state) = &self.app_state {
            let library = state.get_library_state();
            self.render(&library.albums, state.get_viewport());
        }
    }

    fn render(&self, albums: &[Album], viewport: ViewportClass) -> LayoutMode {
        let plan = self.presenter.plan(viewport);
        let mode = plan.mode();
        debug!(?viewport, ?mode, count = albums.len(), "Rendering album view");

        self.compact_list.remove_all();
        self.table_list.remove_all();
        while let Some(child) = self.table_header.first_child() {
            self.table_header.remove(&child);
        }
        self.drag_adapters.borrow_mut().clear();
        *self.row_album_ids.borrow_mut() = albums.iter().map(|album| album.id).collect();

        match plan {
            RenderPlan::Compact(compact) => {
                for album in albums {
                    self.compact_list
                        .append(&self.compact_row(compact, album));
                }
                self.stack.set_visible_child_name(COMPACT_PAGE);
            }
            RenderPlan::Table(table) => {
                self.build_header(&table);
                for album in albums {
                    let row = self.table_row(&table, album);
                    let adapter = RowDragAdapter::new(album);
                    adapter.attach(&GtkDragTransport, row.upcast_ref());
                    self.drag_adapters.borrow_mut().push(adapter);
                    self.table_list.append(&row);
                }
                self.stack.set_visible_child_name(TABLE_PAGE);
            }
        }
        mode
    }

    fn build_header(&self, table: &TablePlan) {
        let current = self
            .app_state
            .as_ref()
            .map(|state| state.get_library_state().sort);

        for column in &table.columns {
            let cell: Widget = match (column, column.sort()) {
                (Column::Actions(actions), Some(sort)) if actions.sortable => {
                    let button = header_button(column, current, sort);
                    if actions.show_favourite_icon {
                        button.set_child(Some(&Image::from_icon_name("emblem-favorite-symbolic")));
                        button.set_tooltip_text(Some("Sort by Favourites"));
                    }
                    self.connect_sort(&button, sort);
                    button.upcast()
                }
                (Column::Actions(actions), _) => {
                    let cell = GtkBox::builder().orientation(Horizontal).build();
                    if actions.show_favourite_icon {
                        cell.append(&Image::from_icon_name("emblem-favorite-symbolic"));
                    }
                    cell.upcast()
                }
                (_, Some(sort)) => {
                    let button = header_button(column, current, sort);
                    self.connect_sort(&button, sort);
                    button.upcast()
                }
                (_, None) => Label::builder()
                    .label(column.label())
                    .xalign(0.0)
                    .css_classes(["heading"])
                    .build()
                    .upcast(),
            };
            size_cell(&cell, column);
            self.table_header.append(&cell);
        }
    }

    fn connect_sort(&self, button: &Button, column_sort: AlbumSort) {
        let Some(state) = self.app_state.clone() else {
            return;
        };
        button.connect_clicked(move |_| {
            let current = state.get_library_state().sort;
            state.request_sort(current.toggled(column_sort));
        });
    }

    fn compact_row(&self, compact: CompactPlan, album: &Album) -> ListBoxRow {
        let entry = compact.row(album);

        let lines = GtkBox::builder()
            .orientation(Vertical)
            .hexpand(true)
            .spacing(2)
            .build();
        lines.append(&ellipsized_label(&entry.primary, &[]));

        let secondary = GtkBox::builder().orientation(Horizontal).spacing(6).build();
        secondary.append(&ellipsized_label(&entry.secondary, &["dim-label"]));
        if let Some(rating) = entry.rating {
            secondary.append(
                &Label::builder()
                    .label(format_rating(rating))
                    .css_classes(["rating"])
                    .build(),
            );
        }
        lines.append(&secondary);
        lines.append(&ellipsized_label(&entry.tertiary, &["dim-label", "caption"]));

        let container = row_container();
        container.append(&lines);
        container.append(&self.context_menu(album).widget);

        let row = ListBoxRow::new();
        row.set_child(Some(&container));
        row.set_activatable(true);
        row
    }

    fn table_row(&self, table: &TablePlan, album: &Album) -> ListBoxRow {
        let container = row_container();
        for column in &table.columns {
            let cell: Widget = match column {
                Column::Name => ellipsized_label(&album.name, &[]).upcast(),
                Column::Field(descriptor) => {
                    let text = descriptor.render_text(album);
                    match descriptor.renderer {
                        FieldRenderer::ArtistLink => self.artist_link(&text),
                        FieldRenderer::Rating => Label::builder()
                            .label(text)
                            .xalign(0.0)
                            .css_classes(["rating"])
                            .build()
                            .upcast(),
                        FieldRenderer::Number | FieldRenderer::Duration => Label::builder()
                            .label(text)
                            .xalign(1.0)
                            .css_classes(["numeric", "dim-label"])
                            .build()
                            .upcast(),
                        FieldRenderer::Text | FieldRenderer::Range => {
                            ellipsized_label(&text, &["dim-label"]).upcast()
                        }
                    }
                }
                Column::Actions(_) => self.context_menu(album).widget,
            };
            size_cell(&cell, column);
            container.append(&cell);
        }

        let row = ListBoxRow::new();
        row.set_child(Some(&container));
        row.set_activatable(true);
        row
    }

    fn artist_link(&self, artist: &str) -> Widget {
        let button = Button::builder()
            .child(&ellipsized_label(artist, &[]))
            .halign(Start)
            .css_classes(["link", "flat"])
            .build();
        if let Some(state) = self.app_state.clone() {
            let artist = artist.to_string();
            button.connect_clicked(move |_| state.request_navigation(ShowArtist(artist.clone())));
        }
        button.upcast()
    }

    fn context_menu(&self, album: &Album) -> AlbumContextMenu {
        let builder = AlbumContextMenu::builder()
            .album(album)
            .features(self.presenter.features());
        match self.app_state.clone() {
            Some(state) => builder
                .on_action(move |action: AlbumAction| state.request_album_action(action))
                .build(),
            None => builder.build(),
        }
    }
}

fn album_list_box() -> ListBox {
    let list_box = ListBox::builder()
        .selection_mode(SelectionNone)
        .css_classes(["boxed-list", "album-list"])
        .build();
    list_box.set_accessible_role(List);
    list_box.set_placeholder(Some(
        &Label::builder()
            .label("No albums")
            .css_classes(["dim-label"])
            .margin_top(24)
            .margin_bottom(24)
            .build(),
    ));
    list_box
}

fn scrolled(child: &impl IsA<Widget>) -> ScrolledWindow {
    ScrolledWindow::builder()
        .child(child)
        .vexpand(true)
        .hscrollbar_policy(Never)
        .build()
}

fn row_container() -> GtkBox {
    GtkBox::builder()
        .orientation(Horizontal)
        .spacing(12)
        .margin_top(8)
        .margin_bottom(8)
        .margin_start(8)
        .margin_end(8)
        .build()
}

fn ellipsized_label(text: &str, css_classes: &[&str]) -> Label {
    let label = Label::builder()
        .label(text)
        .halign(Start)
        .xalign(0.0)
        .ellipsize(End)
        .tooltip_text(text)
        .build();
    for class in css_classes {
        label.add_css_class(class);
    }
    label
}

fn header_button(column: &Column, current: Option<AlbumSort>, sort: AlbumSort) -> Button {
    let indicator = current
        .filter(|current| current.key == sort.key)
        .map(|current| match current.order {
            Asc => " ▴",
            Desc => " ▾",
        })
        .unwrap_or_default();

    Button::builder()
        .label(format!("{}{indicator}", column.label()))
        .halign(Start)
        .css_classes(["flat", "heading"])
        .build()
}

/// Gives header and row cells of the same column identical geometry.
fn size_cell(cell: &impl IsA<Widget>, column: &Column) {
    match column.renderer() {
        Some(FieldRenderer::Text | FieldRenderer::ArtistLink) => cell.set_hexpand(true),
        Some(FieldRenderer::Rating) => cell.set_size_request(96, -1),
        Some(FieldRenderer::Range) => cell.set_size_request(88, -1),
        Some(FieldRenderer::Number | FieldRenderer::Duration) => cell.set_size_request(64, -1),
        None => {
            cell.set_size_request(72, -1);
            cell.set_halign(AlignEnd);
        }
    }
    cell.set_valign(Center);
}
