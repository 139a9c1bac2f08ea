//! 言語スイッチャー
//!
//! 言語状態は持たない。`Binding` 経由でマウントすることで、
//! 他の場所からの言語変更にもハイライトが追従する。

use std::fmt;

use crate::store::{
    Localized,
    TranslationStore,
};
use crate::types::LanguageCode;

/// スイッチャーのラベルに使う翻訳キー
pub const SWITCHER_LABEL_KEY: &str = "languageSwitcher.label";

/// 言語スイッチャー
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LanguageSwitcher;

impl LanguageSwitcher {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// ユーザーが言語を選択した
    ///
    /// 戻り値は `set_language` の結果。`false` の場合、言語は変わっていない。
    pub fn select(&self, store: &TranslationStore, code: &str) -> bool {
        let accepted = store.set_language(code);
        if !accepted {
            tracing::debug!(language = code, "Switcher selection ignored");
        }
        accepted
    }
}

/// 選択肢 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitcherOption {
    pub code: LanguageCode,
    pub display_name: String,
    pub active: bool,
}

/// スイッチャーの描画内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitcherView {
    pub label: String,
    pub options: Vec<SwitcherOption>,
}

impl SwitcherView {
    /// ハイライトされている選択肢
    #[must_use]
    pub fn active(&self) -> Option<&SwitcherOption> {
        self.options.iter().find(|option| option.active)
    }
}

impl fmt::Display for SwitcherView {
    /// `Language: [English] Türkçe`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.label)?;
        for option in &self.options {
            if option.active {
                write!(f, " [{}]", option.display_name)?;
            } else {
                write!(f, " {}", option.display_name)?;
            }
        }
        Ok(())
    }
}

impl Localized for LanguageSwitcher {
    type Output = SwitcherView;

    fn evaluate(&self, store: &TranslationStore) -> SwitcherView {
        let current = store.current_language();
        let options = store
            .available_languages()
            .into_iter()
            .map(|info| SwitcherOption {
                active: info.code == current,
                code: info.code,
                display_name: info.display_name,
            })
            .collect();

        SwitcherView { label: store.translate(SWITCHER_LABEL_KEY), options }
    }
}
