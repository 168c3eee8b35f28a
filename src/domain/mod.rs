// SPDX-License-Identifier: MPL-2.0
//! Domain layer - value types shared by every other module.
//!
//! # Modules
//!
//! - [`language`]: Supported language codes ([`Language`](language::Language))
//! - [`portfolio`]: Remote portfolio documents ([`Profile`](portfolio::Profile),
//!   [`Education`](portfolio::Education), [`WorkExperience`](portfolio::WorkExperience))

pub mod language;
pub mod portfolio;

pub use language::Language;
pub use portfolio::{Education, Profile, WorkExperience};
