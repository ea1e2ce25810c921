//! Window breakpoints feeding the viewport class.
//!
//! Libadwaita evaluates breakpoints against the window's allocated size, so
//! the viewport follows maximize, fullscreen and tiling as well as manual
//! resizes.

use std::sync::Arc;

use {
    libadwaita::{
        ApplicationWindow, Breakpoint, BreakpointCondition,
        BreakpointConditionLengthType::{MaxWidth, MinWidth},
        LengthUnit::Px,
        prelude::AdwApplicationWindowExt,
    },
    tracing::debug,
};

use crate::{
    state::AppState,
    ui::layout::{DESKTOP_MIN_WIDTH, ViewportClass, XSMALL_MAX_WIDTH},
};

/// Largest width, in pixels, still classified as extra-small.
pub const EXTRA_SMALL_MAX_PX: f64 = (XSMALL_MAX_WIDTH - 1) as f64;

/// Smallest width, in pixels, classified as desktop.
pub const DESKTOP_MIN_PX: f64 = DESKTOP_MIN_WIDTH as f64;

/// The two breakpoints bounding the viewport classes.
///
/// Widths between them match neither breakpoint and classify as
/// [`ViewportClass::Other`].
#[derive(Debug, Clone)]
pub struct ViewportBreakpoints {
    /// Applies at `max-width: 599px`.
    pub extra_small: Breakpoint,
    /// Applies at `min-width: 960px`.
    pub desktop: Breakpoint,
}

impl Default for ViewportBreakpoints {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportBreakpoints {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extra_small: Breakpoint::new(BreakpointCondition::new_length(
                MaxWidth,
                EXTRA_SMALL_MAX_PX,
                Px,
            )),
            desktop: Breakpoint::new(BreakpointCondition::new_length(
                MinWidth,
                DESKTOP_MIN_PX,
                Px,
            )),
        }
    }

    /// Maps the window's active breakpoint to a viewport class.
    #[must_use]
    pub fn classify(&self, current: Option<&Breakpoint>) -> ViewportClass {
        match current {
            Some(breakpoint) if *breakpoint == self.extra_small => ViewportClass::ExtraSmall,
            Some(breakpoint) if *breakpoint == self.desktop => ViewportClass::Desktop,
            _ => ViewportClass::Other,
        }
    }

    /// Adds both breakpoints to `window` and publishes every change of the
    /// active one to `app_state`.
    pub fn install(self, window: &ApplicationWindow, app_state: &Arc<AppState>) {
        window.add_breakpoint(self.extra_small.clone());
        window.add_breakpoint(self.desktop.clone());

        app_state.update_viewport(self.classify(window.current_breakpoint().as_ref()));

        let app_state = Arc::clone(app_state);
        window.connect_current_breakpoint_notify(move |window| {
            let viewport = self.classify(window.current_breakpoint().as_ref());
            debug!(?viewport, "Window breakpoint changed");
            app_state.update_viewport(viewport);
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::ui::{
        components::viewport::{DESKTOP_MIN_PX, EXTRA_SMALL_MAX_PX},
        layout::ViewportClass,
    };

    #[test]
    fn test_breakpoint_bounds_match_width_classes() {
        let extra_small_max = EXTRA_SMALL_MAX_PX as i32;
        let desktop_min = DESKTOP_MIN_PX as i32;

        assert_eq!(
            ViewportClass::from_width(extra_small_max),
            ViewportClass::ExtraSmall
        );
        assert_eq!(
            ViewportClass::from_width(extra_small_max + 1),
            ViewportClass::Other
        );
        assert_eq!(
            ViewportClass::from_width(desktop_min - 1),
            ViewportClass::Other
        );
        assert_eq!(
            ViewportClass::from_width(desktop_min),
            ViewportClass::Desktop
        );
    }
}
