// SPDX-License-Identifier: MPL-2.0
//! `folio_sync` keeps a portfolio client's remote data and preferences in step.
//!
//! It provides the localized fetch slices (profile, education, work
//! experience), the persisted theme/language settings with a startup render
//! gate, memoized read views, and the device color-scheme and locale
//! resolvers the presentation layer needs.

#![doc(html_root_url = "https://docs.rs/folio_sync/0.3.0")]

pub mod config;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod paths;
pub mod persistence;
pub mod selectors;
pub mod store;
pub mod sync;
pub mod theming;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{Error, Result};
