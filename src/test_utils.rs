//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use crate::dictionary::{
    DictionaryTable,
    TranslationMap,
};

/// `en`/`tr` の 2 言語を持つ辞書テーブルを作成する
///
/// `farewell` は `en` にのみ存在する（キー欠落のケース）。
pub(crate) fn greeting_table() -> DictionaryTable {
    let mut table = DictionaryTable::new();
    let _ = table.insert(
        "en",
        "English",
        TranslationMap::from_iter([("greeting", "Hello"), ("farewell", "Goodbye")]),
    );
    let _ = table.insert("tr", "Türkçe", TranslationMap::from_iter([("greeting", "Merhaba")]));
    table
}
