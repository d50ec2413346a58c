//! Theme system for consistent UI colors across dark and light modes.
//!
//! The theme follows the user's [`ThemeMode`] preference; `Auto` asks the OS
//! via `dark-light` and falls back to dark when the answer is unknown.

use ratatui::style::Color;

use crate::config::ThemeMode;

/// Semantic color theme for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    // Primary UI colors
    /// Borders, titles, and emphasis
    pub primary: Color,
    /// Highlights, selections, and focus states
    pub accent: Color,
    /// Confirmations such as a finished save
    pub success: Color,
    /// Errors such as a failed save
    pub error: Color,
    /// Busy indicators and cautions
    pub warning: Color,

    // Text hierarchy
    /// Primary text content
    pub text: Color,
    /// Labels and secondary content
    pub text_secondary: Color,
    /// Help text, hidden widgets, and dim content
    pub text_muted: Color,

    // Backgrounds
    /// Main background
    pub background: Color,
    /// Selected row background
    pub highlight_bg: Color,
    /// Panels, the dropdown, and the customizer modal
    pub surface: Color,

    // Dashboard specifics
    /// Search result group headers
    pub group_header: Color,
    /// Drop-target marker while a widget is being moved
    pub drop_target: Color,
}

impl Theme {
    /// Picks the theme for a user preference.
    #[must_use]
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Auto => Self::detect(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    /// Detects the OS theme and returns the matching Theme.
    #[must_use]
    pub fn detect() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Light) => Self::light(),
            // Fall back to dark theme for dark mode, unspecified, or errors
            Ok(dark_light::Mode::Dark | dark_light::Mode::Unspecified) | Err(_) => Self::dark(),
        }
    }

    /// Creates a dark theme optimized for dark terminal backgrounds.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Cyan,
            accent: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,

            text: Color::White,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,

            background: Color::Black,
            highlight_bg: Color::DarkGray,
            surface: Color::Rgb(30, 30, 30),

            group_header: Color::Magenta,
            drop_target: Color::LightGreen,
        }
    }

    /// Creates a light theme optimized for light terminal backgrounds.
    ///
    /// Accent colors are darkened to stay readable on white.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            primary: Color::Blue,
            accent: Color::Rgb(180, 100, 0), // Dark orange for visibility
            success: Color::Rgb(0, 128, 0),  // Dark green
            error: Color::Red,
            warning: Color::Rgb(200, 100, 0),

            text: Color::Black,
            text_secondary: Color::Rgb(60, 60, 60),
            text_muted: Color::Gray,

            background: Color::White,
            highlight_bg: Color::Rgb(230, 230, 230),
            surface: Color::Rgb(245, 245, 245),

            group_header: Color::Rgb(120, 0, 120),
            drop_target: Color::Rgb(0, 110, 60),
        }
    }

    /// Returns true for the light palette.
    #[must_use]
    pub const fn is_light(&self) -> bool {
        matches!(self.background, Color::White)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::detect()
    }
}
