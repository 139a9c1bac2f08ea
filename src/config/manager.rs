//! 設定の保持と差し替え

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    I18nSettings,
    loader,
};

/// 検証済みの設定を保持する
///
/// 読み込み・差し替えに失敗した場合、以前の設定はそのまま残る。
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定（常に検証済み）
    settings: I18nSettings,
    /// 設定を読み込んだワークスペース
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ワークスペースの設定を読み込む
    ///
    /// `workspace_root` が `None` または設定ファイルがない場合はデフォルト設定。
    ///
    /// # Errors
    /// 読み込み・パース・バリデーションのエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let loaded = workspace_root.as_deref().map(loader::load_from_workspace).transpose()?;
        let settings = loaded.flatten().unwrap_or_default();

        self.replace(settings)?;
        self.workspace_root = workspace_root;
        tracing::info!(
            workspace_root = ?self.workspace_root,
            fallback_language = %self.settings.fallback_language,
            "Settings loaded"
        );
        Ok(())
    }

    /// 設定を差し替える
    ///
    /// # Errors
    /// バリデーションエラー
    pub fn update_settings(&mut self, settings: I18nSettings) -> Result<(), ConfigError> {
        self.replace(settings)?;
        tracing::debug!("Settings updated");
        Ok(())
    }

    /// 検証してから保存する
    fn replace(&mut self, settings: I18nSettings) -> Result<(), ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.settings = settings;
        Ok(())
    }

    #[must_use]
    pub const fn settings(&self) -> &I18nSettings {
        &self.settings
    }

    #[must_use]
    pub fn into_settings(self) -> I18nSettings {
        self.settings
    }

    #[must_use]
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }
}
