//! App preference values.
//!
//! # Responsibility
//! - Define the theme preference stored in its own slot.
//! - Keep the fallback default in one place.
//!
//! # Invariants
//! - The theme is read once at startup and passed explicitly to rendering,
//!   never looked up as ambient global state.

use serde::{Deserialize, Serialize};

/// User theme choice; `System` defers to the platform color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

/// Parses a wire-format theme label.
pub fn parse_theme(value: &str) -> Option<ThemePreference> {
    match value {
        "light" => Some(ThemePreference::Light),
        "dark" => Some(ThemePreference::Dark),
        "system" => Some(ThemePreference::System),
        _ => None,
    }
}

/// Wire-format label for a theme preference.
pub fn theme_label(theme: ThemePreference) -> &'static str {
    match theme {
        ThemePreference::Light => "light",
        ThemePreference::Dark => "dark",
        ThemePreference::System => "system",
    }
}
