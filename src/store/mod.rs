// SPDX-License-Identifier: MPL-2.0
//! Process-wide store: three fetch slices plus the settings slice.
//!
//! The store is an explicit object handed to whoever needs it (no global
//! singleton), so tests build isolated instances. State snapshots are
//! published over a [`tokio::sync::watch`] channel; a snapshot is cheap to
//! clone because slice data sits behind `Arc`.
//!
//! Only the reducer of a slice mutates that slice. Fetch triggers move their
//! slice to `loading` synchronously, run the GET on the Tokio runtime, and
//! commit the settlement as a single transition.

pub mod fetch_slice;
pub mod resources;
pub mod settings;

pub use fetch_slice::{FetchAction, FetchState, RequestId, SettlementPolicy};
pub use resources::{EducationResource, ProfileResource, Resource, WorkExperienceResource};
pub use settings::{SettingsAction, SettingsState};

use crate::config::RemoteConfig;
use crate::domain::{Education, Language, Profile, WorkExperience};
use crate::theming::ThemePreference;
use crate::transport::{self, FetchError, JsonFetcher};
use std::sync::{Arc, OnceLock, Weak};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Snapshot of every slice.
#[derive(Debug, Clone, Default)]
pub struct RootState {
    pub profile: FetchState<Option<Profile>>,
    pub education: FetchState<Vec<Education>>,
    pub work_experience: FetchState<Vec<WorkExperience>>,
    pub settings: SettingsState,
}

/// Store-level action, one variant per slice.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Profile(FetchAction<Option<Profile>>),
    Education(FetchAction<Vec<Education>>),
    WorkExperience(FetchAction<Vec<WorkExperience>>),
    Settings(SettingsAction),
}

impl Action {
    /// Slice name and transition kind, for logs.
    fn label(&self) -> (&'static str, &'static str) {
        match self {
            Action::Profile(action) => (ProfileResource::NAME, action.kind()),
            Action::Education(action) => (EducationResource::NAME, action.kind()),
            Action::WorkExperience(action) => (WorkExperienceResource::NAME, action.kind()),
            Action::Settings(action) => ("settings", action.kind()),
        }
    }
}

struct Inner {
    state: watch::Sender<RootState>,
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
    policy: SettlementPolicy,
    /// Settings commits are queued here once the persistence gateway attaches.
    persist: OnceLock<mpsc::UnboundedSender<SettingsState>>,
}

/// Handle to the shared store. Cloning shares the same state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("base_url", &self.inner.base_url)
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Creates a store with every slice at its default.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, remote: &RemoteConfig) -> Self {
        let (state, _) = watch::channel(RootState::default());
        Self {
            inner: Arc::new(Inner {
                state,
                fetcher,
                base_url: remote.base_url.clone(),
                policy: remote.settlement_policy,
                persist: OnceLock::new(),
            }),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn state(&self) -> RootState {
        self.inner.state.borrow().clone()
    }

    /// Returns the current settings.
    #[must_use]
    pub fn settings(&self) -> SettingsState {
        self.inner.state.borrow().settings
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.inner.state.subscribe()
    }

    /// Applies an action to its owning slice.
    ///
    /// Observers are only notified when the action changed something; a
    /// discarded stale settlement is silent.
    pub fn dispatch(&self, action: Action) {
        let policy = self.inner.policy;
        let mut committed_settings = None;

        self.inner.state.send_if_modified(|state| {
            let (slice, kind) = action.label();
            tracing::debug!(slice, kind, "dispatch");
            match action {
                Action::Profile(action) => fetch_slice::reduce(&mut state.profile, action, policy),
                Action::Education(action) => {
                    fetch_slice::reduce(&mut state.education, action, policy)
                }
                Action::WorkExperience(action) => {
                    fetch_slice::reduce(&mut state.work_experience, action, policy)
                }
                Action::Settings(action) => {
                    state.settings = settings::reduce(state.settings, action);
                    if !matches!(action, SettingsAction::Rehydrate(_)) {
                        committed_settings = Some(state.settings);
                    }
                    true
                }
            }
        });

        if let Some(settings) = committed_settings {
            self.queue_persist(settings);
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn set_theme(&self, theme: ThemePreference) {
        self.dispatch(Action::Settings(SettingsAction::SetTheme(theme)));
    }

    /// Changes the language preference. Does not re-fetch anything; see
    /// [`crate::sync::spawn_language_sync`] for the consumer that does.
    pub fn set_language(&self, language: Language) {
        self.dispatch(Action::Settings(SettingsAction::SetLanguage(language)));
    }

    pub fn reset_settings(&self) {
        self.dispatch(Action::Settings(SettingsAction::Reset));
    }

    // =========================================================================
    // Fetch slices
    // =========================================================================

    /// Triggers a fetch of resource `R` in `language`.
    ///
    /// The slice is `loading` when this returns. The returned handle may be
    /// dropped: completion is observed through state. Failures never escape
    /// the task; they become the slice's `error`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn fetch<R: Resource>(&self, language: Language) -> JoinHandle<()> {
        let request = self.begin_request::<R>();
        let url = transport::resource_url(&self.inner.base_url, language.code(), R::NAME);
        let store = self.clone();

        tokio::spawn(async move {
            tracing::debug!(resource = R::NAME, request, %url, "fetch started");
            let outcome = store
                .inner
                .fetcher
                .get_json(&url)
                .await
                .and_then(|body| {
                    serde_json::from_value::<R::Data>(body)
                        .map_err(|e| FetchError::Decode(e.to_string()))
                });

            let action = match outcome {
                Ok(data) => FetchAction::Fulfilled { request, data },
                Err(err) => {
                    tracing::warn!(resource = R::NAME, request, error = %err, "fetch failed");
                    FetchAction::Rejected {
                        request,
                        error: err
                            .message()
                            .unwrap_or_else(|| R::DEFAULT_ERROR.to_string()),
                    }
                }
            };
            store.dispatch(R::action(action));
        })
    }

    pub fn fetch_profile(&self, language: Language) -> JoinHandle<()> {
        self.fetch::<ProfileResource>(language)
    }

    pub fn fetch_education(&self, language: Language) -> JoinHandle<()> {
        self.fetch::<EducationResource>(language)
    }

    pub fn fetch_work_experience(&self, language: Language) -> JoinHandle<()> {
        self.fetch::<WorkExperienceResource>(language)
    }

    /// Triggers all three slices.
    pub fn fetch_all(&self, language: Language) -> [JoinHandle<()>; 3] {
        [
            self.fetch_profile(language),
            self.fetch_education(language),
            self.fetch_work_experience(language),
        ]
    }

    /// Resets a slice's data and error. `loading` is left as is.
    pub fn clear<R: Resource>(&self) {
        self.dispatch(R::action(FetchAction::Clear));
    }

    pub fn clear_all(&self) {
        self.clear::<ProfileResource>();
        self.clear::<EducationResource>();
        self.clear::<WorkExperienceResource>();
    }

    /// Marks `R` pending and returns the id of the new request.
    fn begin_request<R: Resource>(&self) -> RequestId {
        let policy = self.inner.policy;
        let mut request = 0;
        self.inner.state.send_modify(|state| {
            let slice = R::slice_mut(state);
            request = slice.next_request();
            fetch_slice::reduce(slice, FetchAction::Pending { request }, policy);
        });
        request
    }

    // =========================================================================
    // Persistence hooks
    // =========================================================================

    /// Routes every later settings commit to `tx`. Only the first attach wins.
    pub(crate) fn attach_persistence(&self, tx: mpsc::UnboundedSender<SettingsState>) -> bool {
        self.inner.persist.set(tx).is_ok()
    }

    fn queue_persist(&self, settings: SettingsState) {
        if let Some(tx) = self.inner.persist.get() {
            if tx.send(settings).is_err() {
                tracing::warn!("settings writer stopped; commit not persisted");
            }
        }
    }

    pub(crate) fn downgrade(&self) -> WeakStore {
        WeakStore {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning handle used by background consumers so they do not keep the
/// store alive.
#[derive(Clone)]
pub(crate) struct WeakStore {
    inner: Weak<Inner>,
}

impl WeakStore {
    pub(crate) fn upgrade(&self) -> Option<Store> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{remote_config, ScriptedFetcher};
    use serde_json::json;

    fn store_with(fetcher: &Arc<ScriptedFetcher>, policy: SettlementPolicy) -> Store {
        let fetcher: Arc<dyn JsonFetcher> = fetcher.clone();
        Store::new(fetcher, &remote_config(policy))
    }

    #[tokio::test]
    async fn trigger_is_loading_before_settlement() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let gate = fetcher.hold("http://host/en/profile.json", Ok(json!({"name": "Ada"})));
        let store = store_with(&fetcher, SettlementPolicy::default());

        let handle = store.fetch_profile(Language::En);
        let state = store.state();
        assert!(state.profile.loading);
        assert!(state.profile.error.is_none());

        gate.release();
        handle.await.expect("task");
        let state = store.state();
        assert!(!state.profile.loading);
        assert_eq!(
            (*state.profile.data).as_ref().map(|p| p.name.as_str()),
            Some("Ada")
        );
    }

    #[tokio::test]
    async fn network_error_message_is_surfaced_verbatim() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond(
            "http://host/en/profile.json",
            Err(FetchError::Network("Network Error".into())),
        );
        let store = store_with(&fetcher, SettlementPolicy::default());

        store.fetch_profile(Language::En).await.expect("task");

        let state = store.state();
        assert!(!state.profile.loading);
        assert!(state.profile.data.is_none());
        assert_eq!(state.profile.error.as_deref(), Some("Network Error"));
    }

    #[tokio::test]
    async fn messageless_failure_uses_resource_default() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond(
            "http://host/es/workxp.json",
            Err(FetchError::Network(String::new())),
        );
        let store = store_with(&fetcher, SettlementPolicy::default());

        store.fetch_work_experience(Language::Es).await.expect("task");

        assert_eq!(
            store.state().work_experience.error.as_deref(),
            Some(WorkExperienceResource::DEFAULT_ERROR)
        );
    }

    #[tokio::test]
    async fn wrong_shape_is_a_failure_and_keeps_data() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond(
            "http://host/en/education.json",
            Ok(json!([{"institution": "MIT", "degree": "BSc"}])),
        );
        let store = store_with(&fetcher, SettlementPolicy::default());
        store.fetch_education(Language::En).await.expect("task");
        let before = Arc::clone(&store.state().education.data);

        fetcher.respond("http://host/en/education.json", Ok(json!({"not": "a list"})));
        store.fetch_education(Language::En).await.expect("task");

        let state = store.state();
        assert!(Arc::ptr_eq(&before, &state.education.data));
        assert!(state.education.error.is_some());
        assert!(!state.education.loading);
    }

    #[tokio::test]
    async fn overlapping_triggers_keep_latest_dispatch_by_default() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let en = fetcher.hold("http://host/en/education.json", Ok(json!([{"institution": "en"}])));
        let es = fetcher.hold("http://host/es/education.json", Ok(json!([{"institution": "es"}])));
        let store = store_with(&fetcher, SettlementPolicy::LatestDispatched);

        let first = store.fetch_education(Language::En);
        let second = store.fetch_education(Language::Es);
        es.release();
        second.await.expect("task");
        en.release();
        first.await.expect("task");

        let state = store.state();
        assert_eq!(state.education.data[0].institution, "es");
        assert!(!state.education.loading);
    }

    #[tokio::test]
    async fn overlapping_triggers_last_settled_wins_when_configured() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let en = fetcher.hold("http://host/en/education.json", Ok(json!([{"institution": "en"}])));
        let es = fetcher.hold("http://host/es/education.json", Ok(json!([{"institution": "es"}])));
        let store = store_with(&fetcher, SettlementPolicy::LastSettled);

        let first = store.fetch_education(Language::En);
        let second = store.fetch_education(Language::Es);
        es.release();
        second.await.expect("task");
        en.release();
        first.await.expect("task");

        assert_eq!(store.state().education.data[0].institution, "en");
    }

    #[tokio::test]
    async fn clear_resets_data_and_error_only() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.respond("http://host/en/workxp.json", Err(FetchError::Status(500)));
        let store = store_with(&fetcher, SettlementPolicy::default());
        store.fetch_work_experience(Language::En).await.expect("task");

        store.clear::<WorkExperienceResource>();
        store.clear::<WorkExperienceResource>();

        let state = store.state();
        assert!(state.work_experience.data.is_empty());
        assert!(state.work_experience.error.is_none());
        assert!(!state.work_experience.loading);
    }

    async fn assert_loading_until_settled<R: Resource>(body: serde_json::Value) {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let gate = fetcher.hold(&format!("http://host/es/{}.json", R::NAME), Ok(body));
        let store = store_with(&fetcher, SettlementPolicy::default());
        store.dispatch(R::action(FetchAction::Rejected {
            request: 0,
            error: "earlier failure".into(),
        }));

        let handle = store.fetch::<R>(Language::Es);
        let mut state = store.state();
        let slice = R::slice_mut(&mut state);
        assert!(slice.loading, "{} should be loading", R::NAME);
        assert!(slice.error.is_none(), "{} error should be cleared", R::NAME);

        gate.release();
        handle.await.expect("task");
        let mut state = store.state();
        let slice = R::slice_mut(&mut state);
        assert!(!slice.loading, "{} should have settled", R::NAME);
        assert!(slice.error.is_none());
    }

    #[tokio::test]
    async fn every_resource_is_loading_synchronously_after_trigger() {
        assert_loading_until_settled::<ProfileResource>(json!({"name": "Ada"})).await;
        assert_loading_until_settled::<EducationResource>(json!([{"institution": "UPM"}])).await;
        assert_loading_until_settled::<WorkExperienceResource>(json!([{"company": "Acme"}]))
            .await;
    }

    #[test]
    fn action_label_names_slice_and_transition() {
        let fetch = Action::WorkExperience(FetchAction::Pending { request: 3 });
        assert_eq!(fetch.label(), ("workxp", "pending"));

        let settings = Action::Settings(SettingsAction::SetLanguage(Language::Es));
        assert_eq!(settings.label(), ("settings", "set-language"));
    }

    #[test]
    fn settings_actions_do_not_touch_fetch_slices() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let store = store_with(&fetcher, SettlementPolicy::default());
        let before = Arc::clone(&store.state().education.data);

        store.set_language(Language::Es);
        store.set_theme(ThemePreference::Dark);

        let state = store.state();
        assert_eq!(state.settings.language, Language::Es);
        assert_eq!(state.settings.theme, ThemePreference::Dark);
        assert!(Arc::ptr_eq(&before, &state.education.data));
        assert!(!state.education.loading);
    }

    #[test]
    fn settings_commits_are_queued_once_attached() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let store = store_with(&fetcher, SettlementPolicy::default());
        store.set_theme(ThemePreference::Light);

        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(store.attach_persistence(tx));
        store.set_language(Language::Es);
        store.dispatch(Action::Settings(SettingsAction::Rehydrate(SettingsState::default())));
        store.reset_settings();

        assert_eq!(
            rx.try_recv().ok(),
            Some(SettingsState {
                theme: ThemePreference::Light,
                language: Language::Es
            })
        );
        assert_eq!(rx.try_recv().ok(), Some(SettingsState::default()));
        assert!(rx.try_recv().is_err());
    }
}
