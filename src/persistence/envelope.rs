// SPDX-License-Identifier: MPL-2.0
//! Versioned CBOR envelope around the persisted settings slice.
//!
//! Only [`SettingsState`] is ever written; fetch slices are never persisted
//! and start from their defaults on every launch.

use crate::domain::Language;
use crate::error::{Error, Result};
use crate::store::SettingsState;
use crate::theming::ThemePreference;
use serde::{Deserialize, Serialize};

/// Schema version written by this build.
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEnvelope {
    pub version: u32,
    pub settings: SettingsState,
}

/// Unversioned layout written before the envelope existed: the bare slice.
/// Both fields are required so arbitrary maps are not mistaken for it.
#[derive(Debug, Deserialize)]
struct LegacySettings {
    theme: ThemePreference,
    language: Language,
}

impl From<LegacySettings> for PersistedEnvelope {
    fn from(legacy: LegacySettings) -> Self {
        PersistedEnvelope::new(SettingsState {
            theme: legacy.theme,
            language: legacy.language,
        })
    }
}

impl PersistedEnvelope {
    #[must_use]
    pub fn new(settings: SettingsState) -> Self {
        Self {
            version: CURRENT_VERSION,
            settings,
        }
    }

    /// # Errors
    ///
    /// Returns an error if CBOR serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes)?;
        Ok(bytes)
    }

    /// Decodes a stored blob, migrating the legacy layout to the current
    /// version.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are neither a known envelope version nor
    /// the legacy layout.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        match ciborium::from_reader::<PersistedEnvelope, _>(bytes) {
            Ok(envelope) if envelope.version <= CURRENT_VERSION => Ok(envelope),
            Ok(envelope) => Err(Error::Storage(format!(
                "unsupported envelope version {} (newest known is {CURRENT_VERSION})",
                envelope.version
            ))),
            Err(envelope_err) => ciborium::from_reader::<LegacySettings, _>(bytes)
                .map(PersistedEnvelope::from)
                .map_err(|_| Error::from(envelope_err)),
        }
    }
}
