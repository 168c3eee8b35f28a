// SPDX-License-Identifier: MPL-2.0
//! Language selection from device locale data.
//!
//! Translation tables live with the presentation layer; this module only
//! decides which supported [`Language`](crate::domain::Language) the device
//! maps to.
//!
//! # Features
//!
//! - Reads the device's preferred locale list via `sys-locale`
//! - Normalizes platform spellings (`es_ES`, `es-ES.UTF-8`) into BCP 47 tags
//! - Exact-tag, then base-language matching with a fixed English fallback

pub mod resolver;

pub use resolver::{detect_language, device_locales, resolve_language, DeviceLocale, FALLBACK};
