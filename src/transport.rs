// SPDX-License-Identifier: MPL-2.0
//! HTTP collaborator used by the fetch slices.
//!
//! The store only needs "GET this URL and hand me the JSON body", so the seam
//! is the [`JsonFetcher`] trait. [`HttpFetcher`] is the reqwest-backed
//! implementation used by the binary; tests plug in scripted fakes.

use futures_util::future::BoxFuture;
use serde_json::Value;
use std::fmt;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("FolioSync/", env!("CARGO_PKG_VERSION"));

/// A failed GET. All variants form a single failure class for the slices;
/// the variant only shapes the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// No response was received (DNS, connect, TLS, body read...).
    Network(String),
    /// The host answered with a non-2xx status.
    Status(u16),
    /// The body was not valid JSON or did not match the resource shape.
    Decode(String),
}

impl FetchError {
    /// Returns the message to surface in slice state, if there is one.
    ///
    /// Empty messages count as absent so the slice substitutes its default.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let text = self.to_string();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) | FetchError::Decode(msg) => write!(f, "{msg}"),
            FetchError::Status(code) => write!(f, "Request failed with status code {code}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Black-box GET-JSON fetcher.
pub trait JsonFetcher: Send + Sync + 'static {
    /// Fetches `url` and returns the parsed JSON body.
    fn get_json(&self, url: &str) -> BoxFuture<'_, Result<Value, FetchError>>;
}

/// Builds `{base}/{language}/{resource}.json` with exactly one separator
/// between segments.
#[must_use]
pub fn resource_url(base: &str, language: &str, resource: &str) -> String {
    format!("{}/{language}/{resource}.json", base.trim_end_matches('/'))
}

/// [`JsonFetcher`] over a shared reqwest client.
///
/// No request timeout is configured: in-flight fetches run until the
/// transport itself gives up.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the crate's user agent and redirect policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl JsonFetcher for HttpFetcher {
    fn get_json(&self, url: &str) -> BoxFuture<'_, Result<Value, FetchError>> {
        let url = url.to_string();
        Box::pin(async move { self.fetch(&url).await })
    }
}
