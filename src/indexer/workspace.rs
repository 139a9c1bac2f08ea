//! ワークスペースの翻訳ファイルから辞書テーブルを構築する

use std::collections::hash_map::Entry;
use std::collections::{
    BTreeMap,
    HashMap,
};
use std::path::{
    Path,
    PathBuf,
};

use ignore::WalkBuilder;

use crate::config::{
    FileMatcher,
    I18nSettings,
};
use crate::dictionary::{
    DictionaryTable,
    TranslationMap,
};
use crate::indexer::types::IndexerError;
use crate::input::translation::load_translation_file;
use crate::types::LanguageCode;

/// 翻訳ファイルのインデクサー
#[derive(Clone, Copy, Debug, Default)]
pub struct LocaleIndexer;

impl LocaleIndexer {
    /// 新しいインデクサーを作成
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// ワークスペースをインデックスして辞書テーブルを返す
    ///
    /// 読み込めないファイル、言語を判定できないファイルは警告を出してスキップする。
    ///
    /// # Errors
    /// - 不正な glob パターン
    pub async fn index(
        &self,
        workspace_root: &Path,
        settings: &I18nSettings,
    ) -> Result<DictionaryTable, IndexerError> {
        tracing::debug!(workspace_root = %workspace_root.display(), "Indexing translations");

        let matcher = FileMatcher::new(workspace_root.to_path_buf(), settings)?;
        let files = Self::find_translation_files(&matcher);

        // 並列処理でファイルを読み込む
        let loads =
            files.iter().map(|file| load_translation_file(file, &settings.key_separator));
        let results = futures::future::join_all(loads).await;

        let namespace_separator = settings.effective_namespace_separator();
        let mut merged: BTreeMap<LanguageCode, TranslationMap> = BTreeMap::new();
        let mut spellings: HashMap<String, LanguageCode> = HashMap::new();
        for result in results {
            let file = match result {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!("Skipping translation file: {e}");
                    continue;
                }
            };

            let Some(language) = file.language.clone() else {
                tracing::warn!(
                    file = %file.file_path.display(),
                    "Could not detect language from path, skipping"
                );
                continue;
            };

            // `en-US` と `en_US` は同じ言語として扱い、最初に見つかった表記を使う
            let language = match spellings.entry(language.normalized()) {
                Entry::Occupied(entry) => {
                    if *entry.get() != language {
                        tracing::warn!(
                            file = %file.file_path.display(),
                            language = %language,
                            merged_into = %entry.get(),
                            "Language code differs only in case or separator, merging"
                        );
                    }
                    entry.get().clone()
                }
                Entry::Vacant(entry) => entry.insert(language).clone(),
            };

            merged.entry(language).or_default().extend(file.qualified_keys(namespace_separator));
        }

        let table = Self::build_table(merged, settings)?;

        if settings.diagnostics.missing_keys {
            Self::report_missing_keys(&table, settings);
        }

        tracing::info!(files = files.len(), languages = table.len(), "Indexed translations");
        Ok(table)
    }

    /// `primaryLanguages` の順に並べ、残りをアルファベット順に追加する
    fn build_table(
        mut merged: BTreeMap<LanguageCode, TranslationMap>,
        settings: &I18nSettings,
    ) -> Result<DictionaryTable, IndexerError> {
        let mut table = DictionaryTable::new();

        for code in settings.primary_languages.iter().flatten() {
            if let Some((code, translations)) = merged.remove_entry(code.as_str()) {
                let display_name = settings.display_name_for(code.as_str());
                table.insert(code, display_name, translations)?;
            }
        }

        for (code, translations) in merged {
            let display_name = settings.display_name_for(code.as_str());
            table.insert(code, display_name, translations)?;
        }

        Ok(table)
    }

    /// キーの欠落を警告として出力する
    fn report_missing_keys(table: &DictionaryTable, settings: &I18nSettings) {
        for missing in table.missing_keys() {
            if settings.is_language_required(missing.language.as_str()) {
                tracing::warn!(
                    language = %missing.language,
                    key = %missing.key,
                    "Missing translation"
                );
            }
        }
    }

    /// 翻訳ファイルを検索
    ///
    /// 結果はパス順にソートされる。同じキーが複数ファイルにある場合は後のファイルが優先。
    fn find_translation_files(matcher: &FileMatcher) -> Vec<PathBuf> {
        let workspace_path = matcher.workspace_root();
        let mut found_files = Vec::new();

        // ignore クレートでファイルを走査
        for result in WalkBuilder::new(workspace_path)
            .hidden(false)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            // ファイルのみを対象
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            if matcher.is_translation_file(entry.path()) {
                found_files.push(entry.path().to_path_buf());
            }
        }

        found_files.sort();
        found_files
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[rstest]
    fn build_table_orders_primary_languages_first() {
        let merged: BTreeMap<LanguageCode, TranslationMap> = ["de", "en", "tr"]
            .into_iter()
            .map(|code| (LanguageCode::new(code), TranslationMap::new()))
            .collect();
        let settings = I18nSettings {
            primary_languages: Some(vec!["tr".to_string(), "fr".to_string()]),
            ..I18nSettings::default()
        };

        let table = LocaleIndexer::build_table(merged, &settings).unwrap();

        let codes: Vec<&str> = table.languages().map(|info| info.code.as_str()).collect();
        assert_eq!(codes, vec!["tr", "de", "en"]);
    }

    #[tokio::test]
    async fn index_merges_namespaces_per_language() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "locales/en/common.json", r#"{ "greeting": "Hello" }"#);
        write(root, "locales/en/stats.json", r#"{ "visitors": "Visitors" }"#);
        write(root, "locales/tr/common.json", r#"{ "greeting": "Merhaba" }"#);
        write(root, "locales/tr/stats.json", r#"{ "visitors": "Ziyaretçiler" }"#);

        let table = LocaleIndexer::new().index(root, &I18nSettings::default()).await.unwrap();

        let en = table.get("en").unwrap();
        let tr = table.get("tr").unwrap();
        assert_that!(en.get("common.greeting"), some(eq("Hello")));
        assert_that!(en.get("stats.visitors"), some(eq("Visitors")));
        assert_that!(tr.get("common.greeting"), some(eq("Merhaba")));
        assert_that!(tr.get("stats.visitors"), some(eq("Ziyaretçiler")));
        assert_that!(table.missing_keys(), is_empty());
    }

    #[tokio::test]
    async fn index_skips_invalid_and_unknown_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "locales/en.json", r#"{ "greeting": "Hello" }"#);
        write(root, "locales/tr.json", "{ not json");
        write(root, "locales/misc.json", r#"{ "x": "y" }"#);

        let table = LocaleIndexer::new().index(root, &I18nSettings::default()).await.unwrap();

        let codes: Vec<&str> = table.languages().map(|info| info.code.as_str()).collect();
        assert_eq!(codes, vec!["en"]);
    }

    #[tokio::test]
    async fn index_merges_spellings_of_same_language() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "locales/en-US/common.json", r#"{ "greeting": "Hello" }"#);
        write(root, "locales/en_US/stats.json", r#"{ "visitors": "Visitors" }"#);

        let table = LocaleIndexer::new().index(root, &I18nSettings::default()).await.unwrap();

        let codes: Vec<&str> = table.languages().map(|info| info.code.as_str()).collect();
        assert_eq!(codes, vec!["en-US"]);
        let en = table.get("en-US").unwrap();
        assert_that!(en.get("common.greeting"), some(eq("Hello")));
        assert_that!(en.get("stats.visitors"), some(eq("Visitors")));
    }

    #[tokio::test]
    async fn index_applies_display_names() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "messages/en.json", r#"{ "greeting": "Hello" }"#);
        write(root, "messages/tr.json", r#"{ "greeting": "Merhaba" }"#);
        let settings: I18nSettings =
            serde_json::from_str(r#"{ "displayNames": { "tr": "Türkçe" } }"#).unwrap();

        let table = LocaleIndexer::new().index(root, &settings).await.unwrap();

        let names: Vec<&str> = table.languages().map(|info| info.display_name.as_str()).collect();
        assert_eq!(names, vec!["en", "Türkçe"]);
    }

    #[tokio::test]
    async fn index_with_invalid_pattern_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut settings = I18nSettings::default();
        settings.translation_files.include_patterns = vec!["**/*.{json".to_string()];

        let result = LocaleIndexer::new().index(temp_dir.path(), &settings).await;

        assert!(matches!(result, Err(IndexerError::Pattern(_))));
    }
}
