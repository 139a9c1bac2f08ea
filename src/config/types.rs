use std::collections::HashMap;
use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "translationFiles.includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {message}", path.display())]
    Syntax { path: PathBuf, message: String },

    #[error("Invalid settings in {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One numbered line per error
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    pub translation_files: TranslationFilesConfig,

    pub key_separator: String,
    /// Joins a file's namespace to its keys (`common` + `hello` → `common.hello`).
    /// Falls back to `key_separator` when unset.
    pub namespace_separator: Option<String>,

    /// Language used when no valid preference is available.
    pub fallback_language: String,

    /// Languages listed first in the switcher, in this order.
    /// Remaining languages follow alphabetically.
    pub primary_languages: Option<Vec<String>>,

    /// Language code → name shown in the switcher.
    pub display_names: HashMap<String, String>,

    /// Languages that require translations.
    ///
    /// - `None`: All detected languages are required (default)
    /// - `Some([...])`: Only specified languages are required
    ///
    /// Mutually exclusive with `optional_languages`.
    pub required_languages: Option<Vec<String>>,

    /// Languages where missing translations are ignored.
    ///
    /// Mutually exclusive with `required_languages`.
    pub optional_languages: Option<Vec<String>>,

    /// When `false`, runtime locale hints (e.g. `Accept-Language`) never
    /// override `fallback_language`.
    pub honor_locale_hints: bool,

    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticsConfig {
    /// Log keys missing from some languages after indexing.
    pub missing_keys: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { missing_keys: true }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self {
            include_patterns: vec!["**/{locales,messages}/**/*.json".to_string()],
            exclude_patterns: vec!["node_modules/**".to_string()],
        }
    }
}

impl I18nSettings {
    /// Separator placed between a namespace and its keys.
    #[must_use]
    pub fn effective_namespace_separator(&self) -> &str {
        self.namespace_separator.as_deref().unwrap_or(&self.key_separator)
    }

    /// Whether missing translations in `language` should be reported.
    #[must_use]
    pub fn is_language_required(&self, language: &str) -> bool {
        if let Some(required) = &self.required_languages {
            return required.iter().any(|l| l == language);
        }
        if let Some(optional) = &self.optional_languages {
            return !optional.iter().any(|l| l == language);
        }
        true
    }

    /// Display name for `code`, or the code itself.
    #[must_use]
    pub fn display_name_for(&self, code: &str) -> String {
        self.display_names.get(code).cloned().unwrap_or_else(|| code.to_string())
    }

    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Invalid separator
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if let Some(sep) = &self.namespace_separator
            && sep.is_empty()
        {
            errors.push(ValidationError::new(
                "namespaceSeparator",
                "The separator cannot be empty. Please specify a separator (e.g., \":\"), or remove this field",
            ));
        }

        if self.fallback_language.trim().is_empty() {
            errors.push(ValidationError::new(
                "fallbackLanguage",
                "The fallback language cannot be empty. Example: \"en\"",
            ));
        }

        if self.translation_files.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.includePatterns",
                "At least one pattern is required. Example: [\"**/locales/*.json\"]",
            ));
        }

        for (index, pattern) in self.translation_files.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.translation_files.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("translationFiles.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.required_languages.is_some() && self.optional_languages.is_some() {
            errors.push(ValidationError::new(
                "requiredLanguages/optionalLanguages",
                "Cannot specify both 'requiredLanguages' and 'optionalLanguages'. Please use only one",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            translation_files: TranslationFilesConfig::default(),
            key_separator: ".".to_string(),
            namespace_separator: None,
            fallback_language: "en".to_string(),
            primary_languages: None,
            display_names: HashMap::new(),
            required_languages: None,
            optional_languages: None,
            honor_locale_hints: false,
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}
