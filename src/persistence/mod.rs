// SPDX-License-Identifier: MPL-2.0
//! Settings persistence and the startup render gate.
//!
//! The gateway persists exactly one slice (settings) under one root key.
//! At startup it rehydrates that slice before opening the [`RenderGate`];
//! afterwards every settings commit is written back by a single writer task
//! in commit order.
//!
//! Failures here are never surfaced to the user: a missing or corrupt
//! envelope means defaults, and a failed write is logged and dropped.

pub mod envelope;
pub mod storage;

pub use envelope::{PersistedEnvelope, CURRENT_VERSION};
pub use storage::{FileStorage, MemoryStorage, StorageBackend};

use crate::config::PersistenceConfig;
use crate::error::Result;
use crate::store::{Action, SettingsAction, SettingsState, Store};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// "Rehydration complete" signal the host must honor before rendering
/// settings-dependent UI.
#[derive(Debug, Clone)]
pub struct RenderGate {
    open: Arc<watch::Sender<bool>>,
}

impl Default for RenderGate {
    fn default() -> Self {
        let (open, _) = watch::channel(false);
        Self {
            open: Arc::new(open),
        }
    }
}

impl RenderGate {
    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.open.borrow()
    }

    /// Resolves once the gate is open.
    pub async fn wait(&self) {
        let mut rx = self.open.subscribe();
        // The sender lives in `self`, so this can only end by opening.
        let _ = rx.wait_for(|open| *open).await;
    }

    fn open(&self) {
        self.open.send_replace(true);
    }
}

/// How the startup rehydration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RehydrateOutcome {
    /// A stored envelope was applied.
    Restored,
    /// Nothing was stored; defaults apply.
    Empty,
    /// The stored bytes could not be read or decoded; defaults apply.
    Discarded,
    /// The configured gate timeout elapsed first; defaults apply.
    TimedOut,
}

impl RehydrateOutcome {
    /// True only when storage had no entry at all. A timed-out or unreadable
    /// entry may still hold a preference, so hosts must not seed over it.
    #[must_use]
    pub fn is_first_launch(self) -> bool {
        self == RehydrateOutcome::Empty
    }
}

pub struct PersistenceGateway {
    storage: Arc<dyn StorageBackend>,
    config: PersistenceConfig,
    gate: RenderGate,
}

impl PersistenceGateway {
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>, config: PersistenceConfig) -> Self {
        Self {
            storage,
            config,
            gate: RenderGate::default(),
        }
    }

    /// Handle to the render gate, for the host to poll or await.
    #[must_use]
    pub fn gate(&self) -> RenderGate {
        self.gate.clone()
    }

    /// Reads and decodes the stored envelope.
    pub async fn rehydrate(&self) -> (SettingsState, RehydrateOutcome) {
        let key = self.config.root_key.as_str();
        let bytes = match self.storage.read(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return (SettingsState::default(), RehydrateOutcome::Empty),
            Err(err) => {
                tracing::warn!(key, error = %err, "settings read failed; using defaults");
                return (SettingsState::default(), RehydrateOutcome::Discarded);
            }
        };

        match PersistedEnvelope::decode(&bytes) {
            Ok(envelope) => (envelope.settings, RehydrateOutcome::Restored),
            Err(err) => {
                tracing::warn!(key, error = %err, "persisted settings unusable; using defaults");
                (SettingsState::default(), RehydrateOutcome::Discarded)
            }
        }
    }

    /// Rehydrates `store`, starts the writer, and opens the gate.
    ///
    /// Returns the writer task, which ends once every handle to `store` is
    /// dropped and queued writes are flushed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn start(&self, store: &Store) -> (RehydrateOutcome, JoinHandle<()>) {
        let (settings, outcome) = match self.config.rehydrate_timeout() {
            Some(limit) => tokio::time::timeout(limit, self.rehydrate())
                .await
                .unwrap_or((SettingsState::default(), RehydrateOutcome::TimedOut)),
            None => self.rehydrate().await,
        };

        if outcome == RehydrateOutcome::TimedOut {
            tracing::warn!("settings rehydration timed out; opening gate with defaults");
        }
        store.dispatch(Action::Settings(SettingsAction::Rehydrate(settings)));

        let (tx, rx) = mpsc::unbounded_channel();
        if !store.attach_persistence(tx) {
            tracing::warn!("store already has a settings writer; not attaching another");
        }
        let writer = tokio::spawn(write_loop(
            Arc::clone(&self.storage),
            self.config.root_key.clone(),
            rx,
        ));

        self.gate.open();
        tracing::info!(?outcome, theme = %settings.theme, language = %settings.language, "settings rehydrated");
        (outcome, writer)
    }

    /// Deletes the stored envelope. The in-memory store is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to delete the entry.
    pub async fn purge(&self) -> Result<()> {
        self.storage.remove(&self.config.root_key).await
    }
}

async fn write_loop(
    storage: Arc<dyn StorageBackend>,
    key: String,
    mut commits: mpsc::UnboundedReceiver<SettingsState>,
) {
    while let Some(settings) = commits.recv().await {
        let result = match PersistedEnvelope::new(settings).encode() {
            Ok(bytes) => storage.write(&key, bytes).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => tracing::debug!(key = %key, ?settings, "settings persisted"),
            Err(err) => tracing::warn!(key = %key, error = %err, "settings write failed"),
        }
    }
}
