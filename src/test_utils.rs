// SPDX-License-Identifier: MPL-2.0
//! Test helpers: a scripted [`JsonFetcher`] and config shortcuts.

use crate::config::RemoteConfig;
use crate::store::SettlementPolicy;
use crate::transport::{FetchError, JsonFetcher};
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Base URL used by [`remote_config`].
pub const TEST_BASE_URL: &str = "http://host";

/// Remote config pointing at [`TEST_BASE_URL`].
pub fn remote_config(policy: SettlementPolicy) -> RemoteConfig {
    RemoteConfig {
        base_url: TEST_BASE_URL.to_string(),
        settlement_policy: policy,
    }
}

/// Releases a held response. A release before the request arrives is kept.
#[derive(Debug, Clone)]
pub struct Gate(Arc<Notify>);

impl Gate {
    pub fn release(&self) {
        self.0.notify_one();
    }
}

struct Route {
    response: Result<Value, FetchError>,
    gate: Option<Arc<Notify>>,
}

/// In-memory fetcher answering from a URL table.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<HashMap<String, Route>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `url` immediately.
    pub fn respond(&self, url: &str, response: Result<Value, FetchError>) {
        self.routes.lock().expect("routes lock").insert(
            url.to_string(),
            Route {
                response,
                gate: None,
            },
        );
    }

    /// Answers `url` only after the returned gate is released.
    pub fn hold(&self, url: &str, response: Result<Value, FetchError>) -> Gate {
        let notify = Arc::new(Notify::new());
        self.routes.lock().expect("routes lock").insert(
            url.to_string(),
            Route {
                response,
                gate: Some(Arc::clone(&notify)),
            },
        );
        Gate(notify)
    }

    /// URLs requested so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl JsonFetcher for ScriptedFetcher {
    fn get_json(&self, url: &str) -> BoxFuture<'_, Result<Value, FetchError>> {
        self.calls.lock().expect("calls lock").push(url.to_string());
        let route = self
            .routes
            .lock()
            .expect("routes lock")
            .get(url)
            .map(|route| (route.response.clone(), route.gate.clone()));
        let url = url.to_string();

        Box::pin(async move {
            let Some((response, gate)) = route else {
                return Err(FetchError::Network(format!("no route for {url}")));
            };
            if let Some(gate) = gate {
                gate.notified().await;
            }
            response
        })
    }
}
