//! Main application window and navigation structure.
//!
//! This module implements the `AlbumViewApplication`, which owns the
//! settings, the library database and the shared state, and turns the
//! intents published by the album view into library work and navigation.

use std::sync::Arc;

use {
    libadwaita::{
        Application, ApplicationWindow, HeaderBar, NavigationPage, NavigationView, StatusPage,
        Toast, ToastOverlay, ToolbarView,
        glib::MainContext,
        gtk::{
            Box as GtkBox, Label, ListBox,
            Orientation::{Horizontal, Vertical},
            SelectionMode::None as SelectionNone,
            Widget,
            pango::EllipsizeMode::End,
        },
        prelude::{
            AdwApplicationWindowExt, ApplicationExt, ApplicationExtManual, BoxExt, Cast,
            GtkWindowExt, IsA, WidgetExt,
        },
    },
    parking_lot::RwLock,
    tokio::sync::broadcast::error::RecvError,
    tracing::{debug, info},
};

use crate::{
    config::{FeatureConfig, SettingsManager},
    error::{AppError, ErrorReporter, ResultExt, UiError},
    library::{Album, LibraryDatabase, LibraryWorker},
    state::{
        AppState,
        AppStateEvent::{
            AlbumActionRequested, ErrorReported, NavigationRequested, SortRequested,
            ViewportChanged,
        },
        NavigationIntent::{self, ShowAlbum, ShowArtist},
    },
    ui::{
        components::{ViewportBreakpoints, album_drop_target},
        selection::SettingsFieldSelection,
        utils::{format_duration, format_year_range},
        views::AlbumTableView,
    },
};

const DEFAULT_WIDTH: i32 = 1200;
const DEFAULT_HEIGHT: i32 = 800;
const MIN_WIDTH: i32 = 360;
const MIN_HEIGHT: i32 = 294;

/// Main application class with window management.
pub struct AlbumViewApplication {
    /// The main application instance.
    pub app: Application,
    /// Library database for album queries.
    pub library_db: LibraryDatabase,
    /// Serialized library reads and writes.
    pub library_worker: LibraryWorker,
    /// Application state manager.
    pub app_state: Arc<AppState>,
    /// User settings manager.
    pub settings: Arc<RwLock<SettingsManager>>,
}

impl AlbumViewApplication {
    /// Initializes GTK and Libadwaita on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Ui` when either toolkit cannot be initialized,
    /// typically because no display is available.
    pub fn init_toolkit() -> Result<(), AppError> {
        libadwaita::gtk::init()
            .map_err(|e| UiError::InitializationError(format!("GTK: {e}")))?;
        libadwaita::init()
            .map_err(|e| UiError::InitializationError(format!("Libadwaita: {e}")))?;
        Ok(())
    }

    /// Creates a new application instance.
    ///
    /// Must be called from within the tokio runtime, which the library
    /// worker is spawned on.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if settings cannot be loaded or the library
    /// database cannot be opened.
    pub async fn new() -> Result<Self, AppError> {
        let settings = SettingsManager::new()?;
        let database_path = settings.get_settings().database_path();
        let library_db = LibraryDatabase::open(&database_path).await?;
        info!(path = %database_path.display(), "Library database ready");

        let app_state = Arc::new(AppState::new());
        let library_worker = LibraryWorker::spawn(library_db.clone(), Arc::clone(&app_state));

        let app = Application::builder()
            .application_id("io.github.albumview")
            .build();

        Ok(Self {
            app,
            library_db,
            library_worker,
            app_state,
            settings: Arc::new(RwLock::new(settings)),
        })
    }

    /// Runs the application.
    ///
    /// This method starts the GTK main loop and displays the main window.
    pub fn run(&self) {
        self.app.connect_activate({
            let library_db = self.library_db.clone();
            let library_worker = self.library_worker.clone();
            let app_state = Arc::clone(&self.app_state);
            let settings = Arc::clone(&self.settings);

            move |app| build_ui(app, &library_db, &library_worker, &app_state, &settings)
        });

        let exit_code = self.app.run();
        debug!(?exit_code, "Application exited");
    }
}

/// Builds the main user interface.
fn build_ui(
    app: &Application,
    library_db: &LibraryDatabase,
    library_worker: &LibraryWorker,
    app_state: &Arc<AppState>,
    settings: &Arc<RwLock<SettingsManager>>,
) {
    let window = ApplicationWindow::builder()
        .application(app)
        .title("Albums")
        .default_width(DEFAULT_WIDTH)
        .default_height(DEFAULT_HEIGHT)
        .width_request(MIN_WIDTH)
        .height_request(MIN_HEIGHT)
        .build();
    ViewportBreakpoints::new().install(&window, app_state);

    let features: FeatureConfig = settings.read().features();

    let album_view = AlbumTableView::builder()
        .app_state(Arc::clone(app_state))
        .features(features)
        .selection(SettingsFieldSelection::new(Arc::clone(settings)))
        .build();
    album_view.widget.set_hexpand(true);

    let drop_zone = create_playlist_drop_zone(app_state);
    let main_content = GtkBox::builder().orientation(Horizontal).build();
    main_content.append(&album_view.widget);
    main_content.append(&drop_zone);

    let navigation_view = NavigationView::builder().build();
    navigation_view.add(&page_with_header("Albums", &main_content));

    let toast_overlay = ToastOverlay::new();
    toast_overlay.set_child(Some(&navigation_view));

    MainContext::default().spawn_local({
        let app_state = Arc::clone(app_state);
        let library_db = library_db.clone();
        let library_worker = library_worker.clone();
        let navigation_view = navigation_view.clone();
        let toast_overlay = toast_overlay.clone();

        async move {
            // Keeps the view alive for as long as the window handles events.
            let _album_view = album_view;
            let mut rx = app_state.subscribe();
            loop {
                let event = match rx.recv().await {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Application lagged behind state events");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };

                match event {
                    SortRequested(sort) => library_worker.reload(sort),
                    AlbumActionRequested(action) => library_worker.apply(action),
                    NavigationRequested(intent) => {
                        navigate(&navigation_view, &library_db, &app_state, intent).await;
                    }
                    ViewportChanged(viewport) => drop_zone.set_visible(!viewport.is_extra_small()),
                    ErrorReported(message) => toast_overlay.add_toast(Toast::new(&message)),
                    _ => {}
                }
            }
        }
    });

    library_worker.reload(app_state.get_library_state().sort);

    window.set_content(Some(&toast_overlay));
    window.present();
}

/// Pushes the page an intent asks for.
async fn navigate(
    navigation_view: &NavigationView,
    library_db: &LibraryDatabase,
    app_state: &AppState,
    intent: NavigationIntent,
) {
    match intent {
        ShowAlbum(id) => {
            match library_db
                .get_album(id)
                .await
                .add_contextf(format_args!("Opening album {id}"))
            {
                Ok(album) => navigation_view.push(&album_detail_page(&album)),
                Err(error) => {
                    ErrorReporter::warn(&error, "navigation");
                    app_state.report_error(ErrorReporter::to_user_message(&error));
                }
            }
        }
        ShowArtist(artist) => {
            let albums: Vec<Album> = app_state
                .get_library_state()
                .albums
                .into_iter()
                .filter(|album| album.display_album_artist() == artist || album.artist == artist)
                .collect();
            navigation_view.push(&artist_page(&artist, &albums));
        }
    }
}

fn page_with_header(title: &str, content: &impl IsA<Widget>) -> NavigationPage {
    let toolbar = ToolbarView::new();
    toolbar.add_top_bar(&HeaderBar::new());
    toolbar.set_content(Some(content));
    NavigationPage::builder().child(&toolbar).title(title).build()
}

fn album_detail_page(album: &Album) -> NavigationPage {
    let mut details = vec![album.display_album_artist().to_string()];
    let years = format_year_range(album);
    if !years.is_empty() {
        details.push(years);
    }
    details.push(format!("{} songs", album.song_count));
    details.push(format_duration(album.duration));

    let status = StatusPage::builder()
        .icon_name("media-optical-symbolic")
        .title(album.name.as_str())
        .description(details.join(" · "))
        .build();
    page_with_header(&album.name, &status)
}

fn artist_page(artist: &str, albums: &[Album]) -> NavigationPage {
    let list = ListBox::builder()
        .selection_mode(SelectionNone)
        .css_classes(["boxed-list"])
        .margin_top(12)
        .margin_bottom(12)
        .margin_start(12)
        .margin_end(12)
        .build();
    for album in albums {
        list.append(&row_label(&album.name));
    }
    page_with_header(artist, &list)
}

/// Side panel accepting album drags.
fn create_playlist_drop_zone(app_state: &Arc<AppState>) -> Widget {
    let queued = ListBox::builder()
        .selection_mode(SelectionNone)
        .css_classes(["boxed-list"])
        .build();
    queued.set_placeholder(Some(
        &Label::builder()
            .label("Drag albums here")
            .css_classes(["dim-label"])
            .margin_top(12)
            .margin_bottom(12)
            .build(),
    ));

    let container = GtkBox::builder()
        .orientation(Vertical)
        .spacing(6)
        .width_request(240)
        .margin_top(12)
        .margin_bottom(12)
        .margin_start(12)
        .margin_end(12)
        .css_classes(["playlist-drop-zone"])
        .build();
    container.append(
        &Label::builder()
            .label("Playlist")
            .xalign(0.0)
            .css_classes(["heading"])
            .build(),
    );
    container.append(&queued);

    let app_state = Arc::clone(app_state);
    container.add_controller(album_drop_target(move |item| {
        let library = app_state.get_library_state();
        for id in &item.item.album_ids {
            let name = library
                .albums
                .iter()
                .find(|album| album.id == *id)
                .map_or_else(|| format!("Album {id}"), |album| album.name.clone());
            queued.append(&row_label(&name));
        }
        info!(album_ids = ?item.item.album_ids, "Albums dropped on playlist");
    }));

    container.upcast()
}

fn row_label(text: &str) -> Label {
    Label::builder()
        .label(text)
        .xalign(0.0)
        .ellipsize(End)
        .margin_top(8)
        .margin_bottom(8)
        .margin_start(8)
        .margin_end(8)
        .build()
}
