// SPDX-License-Identifier: MPL-2.0
//! Device locale list → supported language.
//!
//! This is a plain priority chain over the *first* device locale, not an
//! RFC 4647 negotiation: exact tag, then base language, then [`FALLBACK`].

use crate::domain::Language;
use unic_langid::LanguageIdentifier;

/// Language used when nothing on the device matches.
pub const FALLBACK: Language = Language::En;

/// One entry of the device's preferred locale list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLocale {
    /// Full tag as reported, normalized to `-` separators (e.g. `es-ES`).
    pub tag: String,
    /// Base language subtag (e.g. `es`), when the tag parses.
    pub language_code: Option<String>,
}

impl DeviceLocale {
    /// Builds an entry from a raw platform locale string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let tag = normalize_tag(raw);
        let language_code = tag
            .parse::<LanguageIdentifier>()
            .ok()
            .map(|id| id.language.as_str().to_string())
            .filter(|code| code != "und");
        Self { tag, language_code }
    }
}

/// Strips encoding/modifier suffixes (`.UTF-8`, `@euro`) and converts `_`
/// separators as reported by POSIX and Android.
fn normalize_tag(raw: &str) -> String {
    let trimmed = raw.trim();
    let end = trimmed.find(['.', '@']).unwrap_or(trimmed.len());
    trimmed[..end].replace('_', "-")
}

/// Resolves the device's locale list to a supported language.
#[must_use]
pub fn resolve_language(locales: &[DeviceLocale]) -> Language {
    let Some(primary) = locales.first() else {
        return FALLBACK;
    };

    if let Some(lang) = Language::from_code(&primary.tag) {
        return lang;
    }

    primary
        .language_code
        .as_deref()
        .and_then(Language::from_code)
        .unwrap_or(FALLBACK)
}

/// Reads the device's preferred locales, most preferred first.
#[must_use]
pub fn device_locales() -> Vec<DeviceLocale> {
    sys_locale::get_locales()
        .map(|raw| DeviceLocale::parse(&raw))
        .collect()
}

/// Resolves the live device locale list. Call once at startup.
#[must_use]
pub fn detect_language() -> Language {
    let locales = device_locales();
    let language = resolve_language(&locales);
    tracing::debug!(primary = ?locales.first().map(|l| l.tag.as_str()), %language, "resolved device language");
    language
}
