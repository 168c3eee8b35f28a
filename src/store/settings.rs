// SPDX-License-Identifier: MPL-2.0
//! User preferences slice: theme and language.
//!
//! This is the only slice the persistence gateway writes to device storage.

use crate::domain::Language;
use crate::theming::ThemePreference;
use serde::{Deserialize, Serialize};

/// Persisted preferences. Both fields always hold a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsState {
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    SetTheme(ThemePreference),
    SetLanguage(Language),
    Reset,
    /// Replaces the whole slice with rehydrated values.
    Rehydrate(SettingsState),
}

impl SettingsAction {
    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SettingsAction::SetTheme(_) => "set-theme",
            SettingsAction::SetLanguage(_) => "set-language",
            SettingsAction::Reset => "reset",
            SettingsAction::Rehydrate(_) => "rehydrate",
        }
    }
}

/// Pure reducer: total over its closed input domain.
#[must_use]
pub fn reduce(state: SettingsState, action: SettingsAction) -> SettingsState {
    match action {
        SettingsAction::SetTheme(theme) => SettingsState { theme, ..state },
        SettingsAction::SetLanguage(language) => SettingsState { language, ..state },
        SettingsAction::Reset => SettingsState::default(),
        SettingsAction::Rehydrate(restored) => restored,
    }
}
