//! i18n-store
//!
//! セッション単位の翻訳ストア。アクティブな言語と辞書テーブルを保持し、
//! 言語変更をマウント中のコンポーネントへ通知する。

pub mod config;
pub mod dictionary;
pub mod indexer;
pub mod input;
pub mod store;
#[cfg(test)]
mod test_utils;
pub mod types;
pub mod view;

pub use dictionary::{
    DictionaryTable,
    TranslationMap,
};
pub use store::{
    Binding,
    Localized,
    RenderTrigger,
    Subscription,
    TranslationStore,
};
pub use types::{
    LanguageCode,
    LanguageInfo,
};
pub use view::LanguageSwitcher;
