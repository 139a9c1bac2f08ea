//! Translation file input definitions

use std::collections::{
    HashMap,
    HashSet,
};
use std::path::{
    Path,
    PathBuf,
};
use std::sync::LazyLock;

use jsonc_parser::ParseOptions;
use serde_json::Value;
use thiserror::Error;

use crate::types::{
    LanguageCode,
    normalize_language_code,
};

/// Errors raised while reading a single translation file.
#[derive(Error, Debug)]
pub enum TranslationFileError {
    #[error("Failed to read translation file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse translation file: {0}")]
    Parse(String),

    #[error("Translation file root must be an object")]
    NotAnObject,
}

/// RFC 5646 language codes
/// Based on <http://tools.ietf.org/html/rfc5646>
#[rustfmt::skip]
static LANGUAGE_CODES: LazyLock<HashSet<String>> = LazyLock::new(|| {
    [
        "af", "af-ZA", "ar", "ar-AE", "ar-EG", "ar-SA", "az", "az-AZ", "be", "be-BY",
        "bg", "bg-BG", "bs-BA", "ca", "ca-ES", "cs", "cs-CZ", "cy", "cy-GB", "da", "da-DK",
        "de", "de-AT", "de-CH", "de-DE", "el", "el-GR", "en", "en-AU", "en-CA", "en-GB",
        "en-IE", "en-NZ", "en-US", "en-ZA", "eo", "es", "es-AR", "es-CL", "es-CO", "es-ES",
        "es-MX", "et", "et-EE", "eu", "eu-ES", "fa", "fa-IR", "fi", "fi-FI", "fr", "fr-BE",
        "fr-CA", "fr-CH", "fr-FR", "gl", "gl-ES", "he", "he-IL", "hi", "hi-IN", "hr", "hr-HR",
        "hu", "hu-HU", "hy", "hy-AM", "id", "id-ID", "is", "is-IS", "it", "it-IT", "ja",
        "ja-JP", "ka", "ka-GE", "kk", "kk-KZ", "ko", "ko-KR", "lt", "lt-LT", "lv", "lv-LV",
        "mk", "mk-MK", "mn", "mn-MN", "ms", "ms-MY", "nb", "nb-NO", "nl", "nl-BE", "nl-NL",
        "nn-NO", "pl", "pl-PL", "pt", "pt-BR", "pt-PT", "ro", "ro-RO", "ru", "ru-RU", "sk",
        "sk-SK", "sl", "sl-SI", "sq", "sq-AL", "sr-SP", "sv", "sv-SE", "sw", "sw-KE", "ta",
        "ta-IN", "th", "th-TH", "tr", "tr-TR", "uk", "uk-UA", "ur", "ur-PK", "uz", "uz-UZ",
        "vi", "vi-VN", "zh", "zh-CN", "zh-HK", "zh-TW",
    ]
    .iter()
    .flat_map(|code| {
        let code = (*code).to_string();
        let normalized = normalize_language_code(&code);
        [code, normalized]
    })
    .collect()
});

/// Returns true if `code` is a known language code, in any casing/separator style.
#[must_use]
pub fn is_known_language_code(code: &str) -> bool {
    LANGUAGE_CODES.contains(code) || LANGUAGE_CODES.contains(&normalize_language_code(code))
}

/// Detect language from file path heuristically
///
/// Splits the path by '/' and '.', then searches backwards for a part
/// that matches a known language code.
///
/// # Examples
/// - `locales/en.json` → `en`
/// - `messages/ja-JP.json` → `ja-JP`
/// - `translations/en_US/common.json` → `en_US`
#[must_use]
pub fn detect_language_from_path(file_path: &Path) -> Option<LanguageCode> {
    let path_str = file_path.to_string_lossy();

    path_str
        .split(['/', '\\', '.'])
        .rev()
        .find(|part| !part.is_empty() && is_known_language_code(part))
        .map(LanguageCode::from)
}

/// Detect namespace from file path.
///
/// Language codes (en, ja, etc.) are not treated as namespaces.
///
/// # Examples
/// - `locales/en/common.json` -> Some("common") (file name is namespace)
/// - `locales/common/en.json` -> Some("common") (directory name is namespace)
/// - `locales/en.json` -> None (single file)
#[must_use]
pub fn detect_namespace_from_path(file_path: &Path) -> Option<String> {
    let file_stem = file_path.file_stem()?.to_string_lossy().to_string();
    if !is_known_language_code(&file_stem) {
        return Some(file_stem);
    }

    let parent_name = file_path.parent()?.file_name()?.to_string_lossy().to_string();
    let common_parents = ["locales", "messages", "translations", "i18n", "lang", "langs"];
    if !is_known_language_code(&parent_name)
        && !common_parents.contains(&parent_name.to_lowercase().as_str())
    {
        return Some(parent_name);
    }

    None
}

/// Flatten nested JSON object into dot-separated key map.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use i18n_store::input::translation::flatten_json;
///
/// let json = json!({
///     "common": {
///         "hello": "Hello",
///         "goodbye": "Goodbye"
///     }
/// });
///
/// let flattened = flatten_json(&json, ".", None);
/// assert_eq!(flattened.get("common.hello"), Some(&"Hello".to_string()));
/// assert_eq!(flattened.get("common.goodbye"), Some(&"Goodbye".to_string()));
/// ```
#[must_use]
pub fn flatten_json(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
) -> HashMap<String, String> {
    let mut result = HashMap::new();
    flatten_json_value(json, separator, prefix, &mut result);
    result
}

/// Recursive step of [`flatten_json`]
fn flatten_json_value(
    json: &Value,
    separator: &str,
    prefix: Option<&str>,
    result: &mut HashMap<String, String>,
) {
    match json {
        Value::Object(map) => {
            for (key, value) in map {
                let full_key =
                    prefix.map_or_else(|| key.clone(), |p| format!("{p}{separator}{key}"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::Array(arr) => {
            for (index, value) in arr.iter().enumerate() {
                let full_key =
                    prefix.map_or_else(|| format!("[{index}]"), |p| format!("{p}[{index}]"));
                flatten_json_value(value, separator, Some(&full_key), result);
            }
        }
        Value::String(s) => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), s.clone());
            }
        }
        _ => {
            if let Some(key) = prefix {
                result.insert(key.to_string(), json.to_string());
            }
        }
    }
}

/// Parse translation file contents. Comments and trailing commas are accepted.
///
/// # Errors
/// Returns error if the text is not valid JSONC or its root is not an object.
pub fn parse_translation_text(text: &str) -> Result<Value, TranslationFileError> {
    let value = jsonc_parser::parse_to_serde_value(text, &ParseOptions::default())
        .map_err(|e| TranslationFileError::Parse(e.to_string()))?;

    match value {
        Some(value @ Value::Object(_)) => Ok(value),
        // An empty file is treated as an empty object.
        None => Ok(Value::Object(serde_json::Map::new())),
        Some(_) => Err(TranslationFileError::NotAnObject),
    }
}

/// A translation file loaded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFile {
    pub file_path: PathBuf,
    /// `None` when no known language code appears in the path.
    pub language: Option<LanguageCode>,
    /// Namespace inferred from file path (e.g., "common", "errors").
    pub namespace: Option<String>,
    /// Flattened translation key map (e.g., "common.hello" -> "Hello").
    pub keys: HashMap<String, String>,
}

impl TranslationFile {
    /// Keys prefixed with the namespace, if there is one.
    #[must_use]
    pub fn qualified_keys(&self, namespace_separator: &str) -> HashMap<String, String> {
        match &self.namespace {
            Some(ns) => self
                .keys
                .iter()
                .map(|(key, value)| (format!("{ns}{namespace_separator}{key}"), value.clone()))
                .collect(),
            None => self.keys.clone(),
        }
    }
}

/// Load translation file.
///
/// # Errors
/// Returns error if file read or JSON parse fails.
pub async fn load_translation_file(
    file_path: &Path,
    separator: &str,
) -> Result<TranslationFile, TranslationFileError> {
    let content = tokio::fs::read_to_string(file_path)
        .await
        .map_err(|source| TranslationFileError::Io { path: file_path.to_path_buf(), source })?;

    let json = parse_translation_text(&content)?;
    let keys = flatten_json(&json, separator, None);

    tracing::debug!(file = %file_path.display(), keys = keys.len(), "Loaded translation file");

    Ok(TranslationFile {
        file_path: file_path.to_path_buf(),
        language: detect_language_from_path(file_path),
        namespace: detect_namespace_from_path(file_path),
        keys,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[googletest::test]
    fn test_flatten_json_nested() {
        let json = json!({
            "common": {
                "hello": "Hello",
                "goodbye": "Goodbye"
            },
            "errors": {
                "notFound": "Not found"
            }
        });

        let result = flatten_json(&json, ".", None);

        expect_that!(result.get("common.hello"), some(eq(&"Hello".to_string())));
        expect_that!(result.get("common.goodbye"), some(eq(&"Goodbye".to_string())));
        expect_that!(result.get("errors.notFound"), some(eq(&"Not found".to_string())));
        expect_that!(result.len(), eq(3));
    }

    #[googletest::test]
    fn test_flatten_json_custom_separator() {
        let json = json!({ "common": { "hello": "Hello" } });

        let result = flatten_json(&json, "_", None);

        expect_that!(result.get("common_hello"), some(eq(&"Hello".to_string())));
    }

    #[googletest::test]
    fn test_flatten_json_arrays_and_scalars() {
        let json = json!({
            "items": ["apple", { "name": "Bob" }],
            "count": 42,
            "enabled": true
        });

        let result = flatten_json(&json, ".", None);

        expect_that!(result.get("items[0]"), some(eq(&"apple".to_string())));
        expect_that!(result.get("items[1].name"), some(eq(&"Bob".to_string())));
        expect_that!(result.get("count"), some(eq(&"42".to_string())));
        expect_that!(result.get("enabled"), some(eq(&"true".to_string())));
    }

    #[rstest]
    #[case("/path/to/locales/en/trans.json", Some("en"))]
    #[case("/path/to/locales/tr.json", Some("tr"))]
    #[case("/path/to/locales/hoge/trans.json", None)]
    #[case("/path/to/en/locales/trans.json", Some("en"))]
    #[case("/path/to/locales/en-trans.json", None)]
    #[case("/path/to/locales/en-US/trans.json", Some("en-US"))]
    #[case("/path/to/locales/en_us/trans.json", Some("en_us"))]
    // When multiple locale names are included, the last match is returned
    #[case("/path/to/locales/en/ja.json", Some("ja"))]
    fn test_detect_language_from_path(#[case] path: &str, #[case] expected: Option<&str>) {
        let result = detect_language_from_path(Path::new(path));
        assert_eq!(result.as_ref().map(LanguageCode::as_str), expected);
    }

    #[rstest]
    #[case("/path/to/locales/en/common.json", Some("common"))]
    #[case("/path/to/locales/common/en.json", Some("common"))]
    #[case("/path/to/locales/en.json", None)]
    #[case("/path/to/i18n/tr.json", None)]
    fn test_detect_namespace_from_path(#[case] path: &str, #[case] expected: Option<&str>) {
        let result = detect_namespace_from_path(Path::new(path));
        assert_eq!(result.as_deref(), expected);
    }

    #[googletest::test]
    fn test_parse_translation_text_accepts_comments() {
        let text = r#"{
  // page title
  "title": "Stats",
  "nav": { "home": "Home", },
}"#;

        let value = parse_translation_text(text).unwrap();

        expect_that!(value["title"].as_str(), some(eq("Stats")));
        expect_that!(value["nav"]["home"].as_str(), some(eq("Home")));
    }

    #[rstest]
    #[case::array("[1, 2]")]
    #[case::string(r#""hello""#)]
    fn test_parse_translation_text_rejects_non_object(#[case] text: &str) {
        let result = parse_translation_text(text);

        assert!(matches!(result, Err(TranslationFileError::NotAnObject)));
    }

    #[rstest]
    fn test_parse_translation_text_invalid() {
        let result = parse_translation_text("{ \"a\": ");

        assert!(matches!(result, Err(TranslationFileError::Parse(_))));
    }

    #[rstest]
    fn test_parse_translation_text_empty() {
        let value = parse_translation_text("").unwrap();

        assert_eq!(value, json!({}));
    }

    #[rstest]
    fn test_qualified_keys() {
        let file = TranslationFile {
            file_path: PathBuf::from("/locales/en/common.json"),
            language: Some(LanguageCode::new("en")),
            namespace: Some("common".to_string()),
            keys: HashMap::from([("hello".to_string(), "Hello".to_string())]),
        };

        let keys = file.qualified_keys(":");

        assert_eq!(keys.get("common:hello"), Some(&"Hello".to_string()));
        assert_eq!(keys.len(), 1);
    }

    #[tokio::test]
    async fn test_load_translation_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let dir = temp_dir.path().join("locales");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tr.json");
        std::fs::write(&path, r#"{ "greeting": "Merhaba" }"#).unwrap();

        let file = load_translation_file(&path, ".").await.unwrap();

        assert_eq!(file.language, Some(LanguageCode::new("tr")));
        assert_eq!(file.namespace, None);
        assert_eq!(file.keys.get("greeting"), Some(&"Merhaba".to_string()));
    }

    #[tokio::test]
    async fn test_load_translation_file_missing() {
        let result = load_translation_file(Path::new("/nonexistent/en.json"), ".").await;

        assert!(matches!(result, Err(TranslationFileError::Io { .. })));
    }
}
