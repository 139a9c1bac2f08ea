//! `.i18n-store.json` の読み込み

use std::path::Path;

use jsonc_parser::ParseOptions;
use serde_json::Value;

use super::{
    ConfigError,
    I18nSettings,
};

/// ワークスペースルートに置く設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".i18n-store.json";

/// ワークスペースルートの設定ファイルを読み込む
///
/// 翻訳ファイルと同じく JSONC（コメント・末尾カンマ）を受け付ける。
/// ファイルがなければ `Ok(None)`、空のファイルはデフォルト設定になる。
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<I18nSettings>, ConfigError> {
    let path = workspace_root.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "No configuration file");
        return Ok(None);
    }

    let text = std::fs::read_to_string(&path)
        .map_err(|source| ConfigError::Read { path: path.clone(), source })?;

    let value = jsonc_parser::parse_to_serde_value(&text, &ParseOptions::default())
        .map_err(|e| ConfigError::Syntax { path: path.clone(), message: e.to_string() })?
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

    let settings = serde_json::from_value(value)
        .map_err(|source| ConfigError::Settings { path: path.clone(), source })?;

    tracing::debug!(path = %path.display(), "Configuration file loaded");
    Ok(Some(settings))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    fn workspace_with_config(content: &str) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), content).unwrap();
        temp_dir
    }

    #[rstest]
    fn reads_jsonc_config() {
        let temp_dir = workspace_with_config(
            r#"{
                // 保存された設定がない場合の言語
                "fallbackLanguage": "tr",
                "primaryLanguages": ["tr", "en"],
            }"#,
        );

        let settings = load_from_workspace(temp_dir.path()).unwrap().unwrap();

        assert_that!(settings.fallback_language, eq("tr"));
        assert_that!(
            settings.primary_languages,
            some(elements_are![eq("tr"), eq("en")])
        );
    }

    #[rstest]
    fn missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();

        assert!(load_from_workspace(temp_dir.path()).unwrap().is_none());
    }

    #[rstest]
    fn empty_file_is_default() {
        let temp_dir = workspace_with_config("");

        let settings = load_from_workspace(temp_dir.path()).unwrap().unwrap();

        assert_that!(settings.fallback_language, eq("en"));
    }

    #[rstest]
    fn syntax_error_names_file() {
        let temp_dir = workspace_with_config("{ invalid");

        let error = load_from_workspace(temp_dir.path()).unwrap_err();

        assert!(matches!(error, ConfigError::Syntax { .. }));
        assert!(error.to_string().contains(CONFIG_FILE_NAME));
    }

    #[rstest]
    fn wrong_field_type_is_settings_error() {
        let temp_dir = workspace_with_config(r#"{ "honorLocaleHints": "yes" }"#);

        let error = load_from_workspace(temp_dir.path()).unwrap_err();

        assert!(matches!(error, ConfigError::Settings { .. }));
    }
}
