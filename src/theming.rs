// SPDX-License-Identifier: MPL-2.0
//! Theme preference and effective color scheme resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User-chosen theme, stored independently of the device's live signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown theme name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid theme: {0}")]
pub struct InvalidTheme(pub String);

impl FromStr for ThemePreference {
    type Err = InvalidTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            other => Err(InvalidTheme(other.to_string())),
        }
    }
}

/// Effective scheme the presentation layer renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
}

impl ColorScheme {
    #[must_use]
    pub fn is_dark(self) -> bool {
        self == ColorScheme::Dark
    }
}

/// Combines the stored preference with the device signal.
///
/// An explicit preference wins outright. `System` follows the device, and
/// only an explicit dark signal yields dark: an absent or unknown signal
/// resolves to light.
#[must_use]
pub fn resolve_color_scheme(
    preference: ThemePreference,
    device: Option<ColorScheme>,
) -> ColorScheme {
    match preference {
        ThemePreference::Light => ColorScheme::Light,
        ThemePreference::Dark => ColorScheme::Dark,
        ThemePreference::System => match device {
            Some(ColorScheme::Dark) => ColorScheme::Dark,
            Some(ColorScheme::Light) | None => ColorScheme::Light,
        },
    }
}

/// Reads the device's current color scheme, `None` when it cannot tell.
#[must_use]
pub fn device_color_scheme() -> Option<ColorScheme> {
    match dark_light::detect() {
        Ok(dark_light::Mode::Dark) => Some(ColorScheme::Dark),
        Ok(dark_light::Mode::Light) => Some(ColorScheme::Light),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!(error = ?err, "device color scheme detection failed");
            None
        }
    }
}

/// [`resolve_color_scheme`] against the live device signal.
#[must_use]
pub fn effective_color_scheme(preference: ThemePreference) -> ColorScheme {
    resolve_color_scheme(preference, device_color_scheme())
}
