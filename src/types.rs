//! Core types used throughout the project.

use std::borrow::Borrow;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

/// A language code such as `en`, `tr` or `en-US`.
///
/// Opaque: the store only compares codes for equality, it never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form with `-` replaced by `_` (`en-US` → `en_us`).
    #[must_use]
    pub fn normalized(&self) -> String {
        normalize_language_code(&self.0)
    }

    /// Primary subtag (`en-US` → `en`).
    #[must_use]
    pub fn primary_subtag(&self) -> &str {
        primary_subtag(&self.0)
    }
}

/// Normalize language code (lowercase and replace - with _)
#[must_use]
pub fn normalize_language_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

/// Primary language subtag of a code (`zh-Hant-TW` → `zh`, `pt_BR` → `pt`).
#[must_use]
pub fn primary_subtag(code: &str) -> &str {
    code.split(['-', '_']).next().unwrap_or(code)
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LanguageCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A language offered to the user: its code and a human readable name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub code: LanguageCode,
    pub display_name: String,
}

impl LanguageInfo {
    #[must_use]
    pub fn new(code: impl Into<LanguageCode>, display_name: impl Into<String>) -> Self {
        Self { code: code.into(), display_name: display_name.into() }
    }
}
