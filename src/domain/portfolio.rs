// SPDX-License-Identifier: MPL-2.0
//! Portfolio documents served by the remote JSON host.
//!
//! Only the fields the selectors and the demo binary read are typed. Anything
//! else in the body is kept verbatim in `extra`, so a parsed document always
//! carries the full response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// End-date markers that mean "still ongoing".
const CURRENT_MARKERS: [&str; 5] = ["present", "current", "now", "actualidad", "presente"];

/// The portfolio owner's profile (`profile.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `education.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Link or identifier of the certificate, when one was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Education {
    /// Returns true if a non-blank certificate is attached.
    #[must_use]
    pub fn has_certificate(&self) -> bool {
        self.certificate
            .as_deref()
            .is_some_and(|cert| !cert.trim().is_empty())
    }
}

/// One entry of `workxp.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkExperience {
    /// Returns true if the end date marks this position as ongoing.
    ///
    /// An absent or blank end date counts as ongoing, as do the localized
    /// "present" markers the data files use.
    #[must_use]
    pub fn is_current(&self) -> bool {
        match self.end_date.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(end) => CURRENT_MARKERS
                .iter()
                .any(|marker| end.eq_ignore_ascii_case(marker)),
        }
    }

    /// Case-insensitive, whitespace-trimmed company comparison.
    #[must_use]
    pub fn is_at_company(&self, company: &str) -> bool {
        let wanted = company.trim();
        !wanted.is_empty() && self.company.trim().to_lowercase() == wanted.to_lowercase()
    }
}
