// SPDX-License-Identifier: MPL-2.0
//! Generic `{data, loading, error}` slice for one remote resource.
//!
//! The three portfolio resources share this reducer; they differ only in the
//! [`Resource`](super::resources::Resource) parameters (URL segment, default
//! data, default error string).

use std::sync::Arc;

/// How overlapping triggers of the same slice are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettlementPolicy {
    /// Only the most recently dispatched request may settle the slice.
    #[default]
    LatestDispatched,
    /// Whichever request settles last overwrites the slice.
    LastSettled,
}

/// Identifies one trigger invocation within a slice.
pub type RequestId = u64;

/// State of one remote resource.
///
/// `data` sits behind an [`Arc`] so selectors can detect "unchanged" by
/// reference. A successful settlement always installs a fresh `Arc`.
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    pub data: Arc<T>,
    pub loading: bool,
    pub error: Option<String>,
    latest_request: RequestId,
}

impl<T: Default> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: Arc::new(T::default()),
            loading: false,
            error: None,
            latest_request: 0,
        }
    }
}

impl<T> FetchState<T> {
    /// Idle state already holding `data`.
    #[must_use]
    pub fn with_data(data: T) -> Self {
        Self {
            data: Arc::new(data),
            loading: false,
            error: None,
            latest_request: 0,
        }
    }

    /// Id to use for the next dispatch.
    #[must_use]
    pub fn next_request(&self) -> RequestId {
        self.latest_request + 1
    }
}

/// Transitions of a [`FetchState`].
#[derive(Debug, Clone, PartialEq)]
pub enum FetchAction<T> {
    Pending { request: RequestId },
    Fulfilled { request: RequestId, data: T },
    Rejected { request: RequestId, error: String },
    Clear,
}

impl<T> FetchAction<T> {
    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FetchAction::Pending { .. } => "pending",
            FetchAction::Fulfilled { .. } => "fulfilled",
            FetchAction::Rejected { .. } => "rejected",
            FetchAction::Clear => "clear",
        }
    }
}

/// Applies `action` to `state`. Returns false when a settlement was
/// discarded as stale under [`SettlementPolicy::LatestDispatched`].
pub fn reduce<T: Default>(
    state: &mut FetchState<T>,
    action: FetchAction<T>,
    policy: SettlementPolicy,
) -> bool {
    let is_stale = |request: RequestId, state: &FetchState<T>| {
        policy == SettlementPolicy::LatestDispatched && request != state.latest_request
    };

    match action {
        FetchAction::Pending { request } => {
            state.latest_request = state.latest_request.max(request);
            state.loading = true;
            state.error = None;
        }
        FetchAction::Fulfilled { request, data } => {
            if is_stale(request, state) {
                return false;
            }
            state.data = Arc::new(data);
            state.loading = false;
            state.error = None;
        }
        FetchAction::Rejected { request, error } => {
            if is_stale(request, state) {
                return false;
            }
            state.loading = false;
            state.error = Some(error);
        }
        FetchAction::Clear => {
            state.data = Arc::new(T::default());
            state.error = None;
        }
    }
    true
}
