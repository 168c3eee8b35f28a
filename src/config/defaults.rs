// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Remote**: JSON host location
//! - **Persistence**: Storage key and rehydration gate
//! - **Selectors**: Parameterized selector cache sizing

// ==========================================================================
// Remote Defaults
// ==========================================================================

/// Host serving `{language}/{resource}.json`.
pub const DEFAULT_BASE_URL: &str = "https://portfolio-data.example.com";

// ==========================================================================
// Persistence Defaults
// ==========================================================================

/// Storage key holding the persisted settings envelope.
pub const DEFAULT_ROOT_KEY: &str = "persist:root";

/// Upper bound accepted for the rehydration gate timeout (in milliseconds).
pub const MAX_REHYDRATE_TIMEOUT_MS: u64 = 60_000;

// ==========================================================================
// Selector Defaults
// ==========================================================================

/// Entries kept per parameterized selector.
pub const DEFAULT_KEYED_CACHE_CAPACITY: usize = 16;

/// Maximum entries per parameterized selector.
pub const MAX_KEYED_CACHE_CAPACITY: usize = 1024;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(DEFAULT_KEYED_CACHE_CAPACITY > 0);
    assert!(DEFAULT_KEYED_CACHE_CAPACITY <= MAX_KEYED_CACHE_CAPACITY);
    assert!(MAX_REHYDRATE_TIMEOUT_MS > 0);
    assert!(!DEFAULT_ROOT_KEY.is_empty());
};
