//! 辞書テーブル
//!
//! 言語コード → 翻訳マップ の対応を保持する。起動時に一度だけ構築され、
//! 以降は読み取り専用。

use std::collections::{
    BTreeSet,
    HashMap,
};

use serde_json::Value;
use thiserror::Error;

use crate::types::{
    LanguageCode,
    LanguageInfo,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("Language '{0}' is already registered")]
    DuplicateLanguage(LanguageCode),

    #[error("Expected a JSON object for {context}, found {found}")]
    NotAnObject { context: String, found: String },
}

/// 翻訳キー → 翻訳文字列
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationMap {
    /// フラット化済みのキーと値
    entries: HashMap<String, String>,
}

impl TranslationMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<HashMap<String, String>> for TranslationMap {
    fn from(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslationMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl Extend<(String, String)> for TranslationMap {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

/// 1 言語分のエントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    pub info: LanguageInfo,
    pub translations: TranslationMap,
}

/// 他の言語には存在するが、この言語には存在しないキー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingKey {
    pub language: LanguageCode,
    pub key: String,
}

/// 言語コード → 翻訳マップ
///
/// 挿入順を保持する。`languages()` はプロセス中常に同じ順序を返す。
#[derive(Debug, Clone, Default)]
pub struct DictionaryTable {
    /// 挿入順のエントリ
    entries: Vec<LanguageEntry>,
    /// 言語コード → `entries` のインデックス
    index: HashMap<LanguageCode, usize>,
}

impl DictionaryTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 言語を追加する
    ///
    /// # Errors
    /// 同じ言語コードが既に登録されている場合
    pub fn insert(
        &mut self,
        code: impl Into<LanguageCode>,
        display_name: impl Into<String>,
        translations: TranslationMap,
    ) -> Result<(), DictionaryError> {
        let code = code.into();
        if self.index.contains_key(&code) {
            return Err(DictionaryError::DuplicateLanguage(code));
        }

        self.index.insert(code.clone(), self.entries.len());
        self.entries.push(LanguageEntry { info: LanguageInfo::new(code, display_name), translations });
        Ok(())
    }

    /// `{ "en": { "greeting": "Hello" }, ... }` 形式の JSON から構築する
    ///
    /// ネストしたオブジェクトは `separator` で連結してフラット化する。
    /// 表示名は言語コードをそのまま使う。JSON オブジェクトは順序を持たないため、
    /// 言語はコード順に並ぶ。登録順が必要な場合は [`Self::insert`] を使う。
    ///
    /// # Errors
    /// ルートまたは言語の値がオブジェクトでない場合、言語コードが重複した場合
    pub fn from_json(json: &Value, separator: &str) -> Result<Self, DictionaryError> {
        let Value::Object(languages) = json else {
            return Err(DictionaryError::NotAnObject {
                context: "dictionary root".to_string(),
                found: json_kind(json).to_string(),
            });
        };

        let mut table = Self::new();
        for (code, translations) in languages {
            if !translations.is_object() {
                return Err(DictionaryError::NotAnObject {
                    context: format!("language '{code}'"),
                    found: json_kind(translations).to_string(),
                });
            }
            let map = crate::input::translation::flatten_json(translations, separator, None);
            table.insert(code.as_str(), code.as_str(), TranslationMap::from(map))?;
        }
        Ok(table)
    }

    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&TranslationMap> {
        self.entry(code).map(|entry| &entry.translations)
    }

    #[must_use]
    pub fn entry(&self, code: &str) -> Option<&LanguageEntry> {
        self.index.get(code).and_then(|&i| self.entries.get(i))
    }

    /// 登録順の言語一覧
    pub fn languages(&self) -> impl Iterator<Item = &LanguageInfo> {
        self.entries.iter().map(|entry| &entry.info)
    }

    /// 登録順のエントリ一覧
    #[must_use]
    pub fn entries(&self) -> &[LanguageEntry] {
        &self.entries
    }

    /// 最初に登録された言語
    #[must_use]
    pub fn first_language(&self) -> Option<&LanguageCode> {
        self.entries.first().map(|entry| &entry.info.code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キーの欠落を検出する
    ///
    /// 全言語のキーの和集合に対し、各言語で欠けているキーを返す。
    /// 結果は言語の登録順、キーの辞書順に並ぶ。
    #[must_use]
    pub fn missing_keys(&self) -> Vec<MissingKey> {
        let all_keys: BTreeSet<&str> =
            self.entries.iter().flat_map(|entry| entry.translations.keys()).collect();

        self.entries
            .iter()
            .flat_map(|entry| {
                all_keys
                    .iter()
                    .filter(|key| !entry.translations.contains_key(key))
                    .map(|key| MissingKey {
                        language: entry.info.code.clone(),
                        key: (*key).to_string(),
                    })
            })
            .collect()
    }
}

/// Short description of a JSON value's kind for error messages.
const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    #[fixture]
    fn table() -> DictionaryTable {
        DictionaryTable::from_json(
            &json!({
                "en": { "greeting": "Hello", "farewell": "Goodbye" },
                "tr": { "greeting": "Merhaba" }
            }),
            ".",
        )
        .unwrap()
    }

    #[rstest]
    fn preserves_insertion_order() {
        let mut table = DictionaryTable::new();
        table.insert("tr", "Türkçe", TranslationMap::new()).unwrap();
        table.insert("en", "English", TranslationMap::new()).unwrap();
        table.insert("de", "Deutsch", TranslationMap::new()).unwrap();

        let codes: Vec<&str> = table.languages().map(|info| info.code.as_str()).collect();

        assert_eq!(codes, vec!["tr", "en", "de"]);
        assert_eq!(table.first_language().map(LanguageCode::as_str), Some("tr"));
    }

    #[rstest]
    fn rejects_duplicate_language() {
        let mut table = DictionaryTable::new();
        table.insert("en", "English", TranslationMap::new()).unwrap();

        let result = table.insert("en", "English (again)", TranslationMap::new());

        assert_eq!(result, Err(DictionaryError::DuplicateLanguage(LanguageCode::new("en"))));
        assert_that!(table.len(), eq(1));
    }

    #[rstest]
    #[googletest::test]
    fn lookup_by_code(table: DictionaryTable) {
        expect_that!(table.contains("en"), eq(true));
        expect_that!(table.contains("fr"), eq(false));
        expect_that!(table.get("tr").and_then(|m| m.get("greeting")), some(eq("Merhaba")));
        expect_that!(table.get("fr"), none());
    }

    #[rstest]
    #[googletest::test]
    fn from_json_flattens_nested_objects() {
        let table = DictionaryTable::from_json(
            &json!({ "en": { "nav": { "home": "Home", "about": "About" } } }),
            ".",
        )
        .unwrap();

        let en = table.get("en").unwrap();
        expect_that!(en.get("nav.home"), some(eq("Home")));
        expect_that!(en.get("nav.about"), some(eq("About")));
        expect_that!(en.len(), eq(2));
    }

    #[rstest]
    fn from_json_orders_languages_by_code() {
        let table = DictionaryTable::from_json(
            &json!({ "tr": { "a": "A" }, "en": { "a": "A" }, "de": { "a": "A" } }),
            ".",
        )
        .unwrap();

        let codes: Vec<&str> = table.languages().map(|info| info.code.as_str()).collect();
        assert_eq!(codes, vec!["de", "en", "tr"]);
    }

    #[rstest]
    #[case::root_array(json!([]))]
    #[case::language_string(json!({ "en": "Hello" }))]
    fn from_json_rejects_non_objects(#[case] json: Value) {
        let result = DictionaryTable::from_json(&json, ".");

        assert!(matches!(result, Err(DictionaryError::NotAnObject { .. })));
    }

    #[rstest]
    fn missing_keys_reports_parity_gaps(table: DictionaryTable) {
        let missing = table.missing_keys();

        assert_eq!(
            missing,
            vec![MissingKey { language: LanguageCode::new("tr"), key: "farewell".to_string() }]
        );
    }

    #[rstest]
    fn missing_keys_is_empty_with_full_parity() {
        let table = DictionaryTable::from_json(
            &json!({ "en": { "a": "A", "b": "B" }, "ja": { "a": "あ", "b": "い" } }),
            ".",
        )
        .unwrap();

        assert_that!(table.missing_keys(), is_empty());
    }
}
