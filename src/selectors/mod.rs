// SPDX-License-Identifier: MPL-2.0
//! Read views over store snapshots.
//!
//! Base selectors are plain projections. Derived selectors are memoized on
//! the identity of the slice data they read (see [`memo`]): asking twice for
//! the same snapshot returns the same `Arc`, and a new fetch result always
//! recomputes. Selectors never fail; missing data yields an empty view.

pub mod memo;

pub use memo::{KeyedMemo, Memo, MemoStats};

use crate::config::SelectorConfig;
use crate::domain::{Education, Language, Profile, WorkExperience};
use crate::store::RootState;
use crate::theming::ThemePreference;
use std::sync::Arc;

// =============================================================================
// Base selectors
// =============================================================================

#[must_use]
pub fn select_profile(state: &RootState) -> &Arc<Option<Profile>> {
    &state.profile.data
}

#[must_use]
pub fn select_education(state: &RootState) -> &Arc<Vec<Education>> {
    &state.education.data
}

#[must_use]
pub fn select_work_experience(state: &RootState) -> &Arc<Vec<WorkExperience>> {
    &state.work_experience.data
}

#[must_use]
pub fn select_theme(state: &RootState) -> ThemePreference {
    state.settings.theme
}

#[must_use]
pub fn select_language(state: &RootState) -> Language {
    state.settings.language
}

#[must_use]
pub fn select_profile_loading(state: &RootState) -> bool {
    state.profile.loading
}

#[must_use]
pub fn select_profile_error(state: &RootState) -> Option<&str> {
    state.profile.error.as_deref()
}

#[must_use]
pub fn select_education_loading(state: &RootState) -> bool {
    state.education.loading
}

#[must_use]
pub fn select_education_error(state: &RootState) -> Option<&str> {
    state.education.error.as_deref()
}

#[must_use]
pub fn select_work_experience_loading(state: &RootState) -> bool {
    state.work_experience.loading
}

#[must_use]
pub fn select_work_experience_error(state: &RootState) -> Option<&str> {
    state.work_experience.error.as_deref()
}

// =============================================================================
// Derivations
// =============================================================================

// Memo inputs are the slice payloads themselves, hence `&Vec`.

#[allow(clippy::ptr_arg)]
fn with_certificates(items: &Vec<Education>) -> Vec<Education> {
    items.iter().filter(|e| e.has_certificate()).cloned().collect()
}

#[allow(clippy::ptr_arg)]
fn current_positions(items: &Vec<WorkExperience>) -> Vec<WorkExperience> {
    items.iter().filter(|w| w.is_current()).cloned().collect()
}

#[allow(clippy::ptr_arg)]
fn current_position(items: &Vec<WorkExperience>) -> Option<WorkExperience> {
    items.iter().find(|w| w.is_current()).cloned()
}

#[allow(clippy::ptr_arg)]
fn by_company(items: &Vec<WorkExperience>, company: &String) -> Vec<WorkExperience> {
    items
        .iter()
        .filter(|w| w.is_at_company(company))
        .cloned()
        .collect()
}

#[allow(clippy::ptr_arg)]
fn by_institution(items: &Vec<Education>, institution: &String) -> Vec<Education> {
    let wanted = institution.trim().to_lowercase();
    if wanted.is_empty() {
        return Vec::new();
    }
    items
        .iter()
        .filter(|e| e.institution.trim().to_lowercase() == wanted)
        .cloned()
        .collect()
}

// =============================================================================
// Memoized selectors
// =============================================================================

/// Memoized derived selectors. One instance per consumer (or shared).
pub struct Selectors {
    with_certificates: Memo<Vec<Education>, Vec<Education>>,
    current_positions: Memo<Vec<WorkExperience>, Vec<WorkExperience>>,
    current_position: Memo<Vec<WorkExperience>, Option<WorkExperience>>,
    by_company: KeyedMemo<String, Vec<WorkExperience>, Vec<WorkExperience>>,
    by_institution: KeyedMemo<String, Vec<Education>, Vec<Education>>,
}

impl Default for Selectors {
    fn default() -> Self {
        Self::new(&SelectorConfig::default())
    }
}

impl Selectors {
    #[must_use]
    pub fn new(config: &SelectorConfig) -> Self {
        let capacity = config.cache_capacity();
        Self {
            with_certificates: Memo::new(with_certificates),
            current_positions: Memo::new(current_positions),
            current_position: Memo::new(current_position),
            by_company: KeyedMemo::new(by_company, capacity),
            by_institution: KeyedMemo::new(by_institution, capacity),
        }
    }

    /// Education entries that carry a certificate.
    pub fn education_with_certificates(&self, state: &RootState) -> Arc<Vec<Education>> {
        self.with_certificates.get(select_education(state))
    }

    /// The first position whose end date marks it as ongoing.
    pub fn current_position(&self, state: &RootState) -> Arc<Option<WorkExperience>> {
        self.current_position.get(select_work_experience(state))
    }

    /// Every ongoing position.
    pub fn current_positions(&self, state: &RootState) -> Arc<Vec<WorkExperience>> {
        self.current_positions.get(select_work_experience(state))
    }

    /// Positions held at `company` (case-insensitive).
    pub fn work_experience_by_company(
        &self,
        state: &RootState,
        company: &str,
    ) -> Arc<Vec<WorkExperience>> {
        self.by_company
            .get(select_work_experience(state), &company.to_string())
    }

    /// Education entries from `institution` (case-insensitive).
    pub fn education_by_institution(
        &self,
        state: &RootState,
        institution: &str,
    ) -> Arc<Vec<Education>> {
        self.by_institution
            .get(select_education(state), &institution.to_string())
    }

    /// Aggregate hit/miss counters of every memoized selector.
    #[must_use]
    pub fn stats(&self) -> MemoStats {
        self.with_certificates.stats()
            + self.current_positions.stats()
            + self.current_position.stats()
            + self.by_company.stats()
            + self.by_institution.stats()
    }
}
