// SPDX-License-Identifier: MPL-2.0
//! Re-fetches portfolio data whenever the language preference changes.
//!
//! `set_language` only updates settings; this consumer observes the change
//! and re-invokes the fetch triggers. It does not cancel fetches already in
//! flight; the store's settlement policy decides which result sticks.

use crate::store::Store;
use tokio::task::JoinHandle;

/// Fetches all resources for the current language, then again on every
/// language change. Start it after rehydration so the first fetch uses the
/// persisted language.
///
/// The task holds no strong reference to the store and ends once the store
/// is dropped.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn spawn_language_sync(store: &Store) -> JoinHandle<()> {
    let mut changes = store.subscribe();
    let weak = store.downgrade();
    let mut current = changes.borrow_and_update().settings.language;
    store.fetch_all(current);

    tokio::spawn(async move {
        while changes.changed().await.is_ok() {
            let language = changes.borrow_and_update().settings.language;
            if language == current {
                continue;
            }
            current = language;

            let Some(store) = weak.upgrade() else {
                break;
            };
            tracing::info!(%language, "language changed; refetching portfolio data");
            store.fetch_all(language);
        }
        tracing::debug!("language sync stopped");
    })
}
