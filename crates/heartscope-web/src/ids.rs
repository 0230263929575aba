#![forbid(unsafe_code)]

//! Page contract: element ids and the few DOM decisions that do not need a
//! browser to test.

use heartscope_core::Theme;

pub const FORM: &str = "predict-form";
pub const SUBMIT_BUTTON: &str = "predict-button";
pub const BUTTON_TEXT: &str = "button-text";
pub const BUTTON_LOADER: &str = "button-loader";
pub const RESULT_CONTENT: &str = "result-content";
pub const RECOMMENDATION: &str = "recommendation-container";
pub const THEME_TOGGLE: &str = "theme-toggle";
pub const SUN_ICON: &str = "theme-icon-sun";
pub const MOON_ICON: &str = "theme-icon-moon";

/// Class toggled on `<html>` for the dark theme.
pub const DARK_CLASS: &str = "dark";
/// Utility class that hides an element.
pub const HIDDEN_CLASS: &str = "hidden";

/// Which theme icons are hidden. The sun shows in dark mode (it switches
/// back to light), the moon in light mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconVisibility {
    pub sun_hidden: bool,
    pub moon_hidden: bool,
}

impl IconVisibility {
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                sun_hidden: false,
                moon_hidden: true,
            },
            Theme::Light => Self {
                sun_hidden: true,
                moon_hidden: false,
            },
        }
    }
}

/// Which parts of the submit button are hidden while `busy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub disabled: bool,
    pub text_hidden: bool,
    pub loader_hidden: bool,
}

impl ButtonState {
    #[must_use]
    pub const fn for_busy(busy: bool) -> Self {
        Self {
            disabled: busy,
            text_hidden: busy,
            loader_hidden: !busy,
        }
    }
}
