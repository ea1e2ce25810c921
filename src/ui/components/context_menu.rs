//! Per-album action cell: favourite toggle and rating popover.

use std::rc::Rc;

use libadwaita::{
    gtk::{
        Align::Center,
        Box as GtkBox, Button, MenuButton,
        Orientation::{Horizontal, Vertical},
        Popover, Widget,
    },
    prelude::{BoxExt, ButtonExt, Cast, PopoverExt, WidgetExt},
};

use crate::{
    config::FeatureConfig,
    library::{Album, MAX_RATING},
    state::AlbumAction,
};

/// Callback receiving the action chosen in the menu.
pub type ActionHandler = Rc<dyn Fn(AlbumAction)>;

/// Builder pattern for configuring `AlbumContextMenu` components.
#[derive(Default)]
pub struct AlbumContextMenuBuilder {
    album: Album,
    features: FeatureConfig,
    on_action: Option<ActionHandler>,
}

impl AlbumContextMenuBuilder {
    /// Sets the album the menu acts on.
    #[must_use]
    pub fn album(mut self, album: &Album) -> Self {
        self.album = album.clone();
        self
    }

    /// Sets which optional entries are offered.
    #[must_use]
    pub fn features(mut self, features: FeatureConfig) -> Self {
        self.features = features;
        self
    }

    /// Sets the handler invoked when an entry is chosen.
    #[must_use]
    pub fn on_action<F>(mut self, on_action: F) -> Self
    where
        F: Fn(AlbumAction) + 'static,
    {
        self.on_action = Some(Rc::new(on_action));
        self
    }

    #[must_use]
    pub fn build(self) -> AlbumContextMenu {
        let on_action = self.on_action.unwrap_or_else(|| Rc::new(|_| {}));
        AlbumContextMenu::new(&self.album, self.features, &on_action)
    }
}

/// Trailing cell of an album row.
///
/// Shows a heart button when favourites are enabled and a menu button whose
/// popover holds the favourite entry and the rating stars.
pub struct AlbumContextMenu {
    /// The underlying GTK widget.
    pub widget: Widget,
    /// Heart button, present when favourites are enabled.
    pub favourite_button: Option<Button>,
    /// Menu button opening the popover.
    pub menu_button: MenuButton,
}

impl AlbumContextMenu {
    /// Creates the menu for `album`.
    #[must_use]
    pub fn new(album: &Album, features: FeatureConfig, on_action: &ActionHandler) -> Self {
        let container = GtkBox::builder()
            .orientation(Horizontal)
            .spacing(2)
            .valign(Center)
            .css_classes(["album-context-menu"])
            .build();

        let favourite_button = features
            .enable_favourites
            .then(|| favourite_toggle(album, on_action));
        if let Some(button) = &favourite_button {
            container.append(button);
        }

        let entries = GtkBox::builder()
            .orientation(Vertical)
            .spacing(6)
            .margin_top(6)
            .margin_bottom(6)
            .margin_start(6)
            .margin_end(6)
            .build();
        let popover = Popover::builder().child(&entries).build();

        if features.enable_favourites {
            let label = if album.starred {
                "Remove from Favourites"
            } else {
                "Add to Favourites"
            };
            let entry = Button::builder()
                .label(label)
                .css_classes(["flat"])
                .build();
            let action = AlbumAction::toggle_starred(album);
            let handler = Rc::clone(on_action);
            let popover_ref = popover.clone();
            entry.connect_clicked(move |_| {
                popover_ref.popdown();
                handler(action);
            });
            entries.append(&entry);
        }

        if features.enable_star_rating {
            entries.append(&rating_stars(album, on_action, &popover));
        }

        let menu_button = MenuButton::builder()
            .icon_name("view-more-symbolic")
            .tooltip_text("Album Actions")
            .css_classes(["flat"])
            .popover(&popover)
            .build();
        menu_button.set_visible(entries.first_child().is_some());
        container.append(&menu_button);

        Self {
            widget: container.upcast(),
            favourite_button,
            menu_button,
        }
    }

    #[must_use]
    pub fn builder() -> AlbumContextMenuBuilder {
        AlbumContextMenuBuilder::default()
    }
}

fn favourite_toggle(album: &Album, on_action: &ActionHandler) -> Button {
    let (icon, tooltip) = if album.starred {
        ("starred-symbolic", "Remove from Favourites")
    } else {
        ("non-starred-symbolic", "Add to Favourites")
    };
    let button = Button::builder()
        .icon_name(icon)
        .tooltip_text(tooltip)
        .css_classes(["flat", "circular"])
        .build();

    let action = AlbumAction::toggle_starred(album);
    let handler = Rc::clone(on_action);
    button.connect_clicked(move |_| handler(action));
    button
}

fn rating_stars(album: &Album, on_action: &ActionHandler, popover: &Popover) -> GtkBox {
    let stars = GtkBox::builder()
        .orientation(Horizontal)
        .halign(Center)
        .css_classes(["rating-stars"])
        .build();

    for value in 1..=MAX_RATING {
        let icon = if value <= album.rating {
            "starred-symbolic"
        } else {
            "non-starred-symbolic"
        };
        let star = Button::builder()
            .icon_name(icon)
            .tooltip_text(format!("Rate {value}"))
            .css_classes(["flat"])
            .build();

        let action = AlbumAction::rate(album, value);
        let handler = Rc::clone(on_action);
        let popover = popover.clone();
        star.connect_clicked(move |_| {
            popover.popdown();
            handler(action);
        });
        stars.append(&star);
    }
    stars
}

