//! 翻訳ストア
//!
//! アクティブな言語と辞書テーブルを保持し、言語変更を購読者に通知する。
//! UI スレッド専用（`Rc` ベースで `!Send`）。

use std::cell::{
    Cell,
    RefCell,
};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use super::error::StoreError;
use super::notifier::{
    ChangeNotifier,
    Subscription,
};
use crate::dictionary::DictionaryTable;
use crate::types::{
    LanguageCode,
    LanguageInfo,
};

/// ストアの共有状態
struct StoreInner {
    /// 辞書テーブル（構築後は不変）
    table: DictionaryTable,
    /// アクティブな言語。常に `table` に存在するコード
    active: RefCell<LanguageCode>,
    /// 通知中に要求された言語変更（通知完了後に順に適用）
    pending: RefCell<VecDeque<LanguageCode>>,
    /// 適用された言語変更の回数
    version: Cell<u64>,
    /// 購読者への通知
    notifier: Rc<ChangeNotifier>,
}

/// 翻訳ストア
///
/// `Clone` は同じストアへのハンドルを複製する。
///
/// # Invariants
///
/// 1. `current_language()` は常に辞書テーブルに存在する。
/// 2. 状態を変える `set_language` 1 回につき通知はちょうど 1 回。
/// 3. 通知時点で新しい状態は既に読める。
#[derive(Clone)]
pub struct TranslationStore {
    /// 共有状態
    inner: Rc<StoreInner>,
}

impl TranslationStore {
    /// 新しいストアを作成
    ///
    /// # Errors
    /// - 辞書テーブルが空
    /// - `initial` が辞書テーブルに存在しない
    pub fn new(table: DictionaryTable, initial: &str) -> Result<Self, StoreError> {
        if table.is_empty() {
            return Err(StoreError::EmptyDictionary);
        }
        if !table.contains(initial) {
            return Err(StoreError::UnknownLanguage(LanguageCode::from(initial)));
        }

        tracing::debug!(initial, languages = table.len(), "Translation store created");

        Ok(Self {
            inner: Rc::new(StoreInner {
                table,
                active: RefCell::new(LanguageCode::from(initial)),
                pending: RefCell::new(VecDeque::new()),
                version: Cell::new(0),
                notifier: Rc::new(ChangeNotifier::default()),
            }),
        })
    }

    /// アクティブな言語
    #[must_use]
    pub fn current_language(&self) -> LanguageCode {
        self.inner.active.borrow().clone()
    }

    /// 選択可能な言語一覧（辞書テーブルの登録順）
    #[must_use]
    pub fn available_languages(&self) -> Vec<LanguageInfo> {
        self.inner.table.languages().cloned().collect()
    }

    /// アクティブな言語でキーを翻訳する
    ///
    /// キーが存在しない、または値が空文字列の場合はキー自体を返す。
    #[must_use]
    pub fn translate(&self, key: &str) -> String {
        let active = self.inner.active.borrow();
        if let Some(value) = self.lookup(active.as_str(), key) {
            return value.to_string();
        }

        tracing::trace!(language = %active, key, "Missing translation, echoing key");
        key.to_string()
    }

    /// 指定した言語でキーを翻訳する
    #[must_use]
    pub fn translate_in(&self, language: &str, key: &str) -> Option<String> {
        self.lookup(language, key).map(str::to_string)
    }

    /// アクティブな言語にキーの翻訳があるか
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        let active = self.inner.active.borrow();
        self.lookup(active.as_str(), key).is_some()
    }

    /// 空でない翻訳値。空文字列は欠落として扱う
    fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        self.inner
            .table
            .get(language)
            .and_then(|map| map.get(key))
            .filter(|value| !value.is_empty())
    }

    /// アクティブな言語を変更する
    ///
    /// - 未知の言語: `false`（状態変更・通知なし）
    /// - 現在と同じ言語: `true`（通知なし）
    /// - それ以外: 状態を変更し、購読者に 1 回だけ通知してから `true`
    ///
    /// 購読者のコールバック内から呼ばれた場合、変更は現在の通知が終わった後に適用される。
    pub fn set_language(&self, code: &str) -> bool {
        if !self.inner.table.contains(code) {
            tracing::warn!(language = code, "Rejected unknown language");
            return false;
        }

        if self.inner.notifier.is_dispatching() {
            return self.defer(code);
        }

        // 前回の通知がパニックで中断された場合の残り
        self.inner.pending.borrow_mut().clear();

        if *self.inner.active.borrow() == *code {
            return true;
        }

        self.apply(LanguageCode::from(code));
        while let Some(next) = self.next_pending() {
            if *self.inner.active.borrow() != next {
                self.apply(next);
            }
        }
        true
    }

    /// 通知中の言語変更を保留する
    fn defer(&self, code: &str) -> bool {
        let mut pending = self.inner.pending.borrow_mut();
        let latest = pending.back().cloned().unwrap_or_else(|| self.current_language());
        if latest == *code {
            return true;
        }

        tracing::debug!(language = code, queued = pending.len() + 1, "Deferred language change");
        pending.push_back(LanguageCode::from(code));
        true
    }

    /// 保留中の次の言語変更
    fn next_pending(&self) -> Option<LanguageCode> {
        self.inner.pending.borrow_mut().pop_front()
    }

    /// 状態を変更して通知する
    fn apply(&self, code: LanguageCode) {
        let previous = self.inner.active.replace(code);
        self.inner.version.set(self.inner.version.get() + 1);

        let _span = tracing::debug_span!(
            "language_change",
            from = %previous,
            to = %self.inner.active.borrow(),
            version = self.inner.version.get()
        )
        .entered();

        let delivered = self.inner.notifier.dispatch();
        tracing::info!(delivered, "Language changed");
    }

    /// 言語変更の購読を開始する
    ///
    /// 返されたハンドルを破棄すると購読は解除される。
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.inner.notifier.register(callback)
    }

    /// 購読を解除する
    ///
    /// 解除済み・他のストアのハンドルの場合は何もせず `false` を返す。
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        subscription.belongs_to(&self.inner.notifier)
            && self.inner.notifier.remove(subscription.id())
    }

    /// 現在の購読者数
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.notifier.len()
    }

    /// 適用された言語変更の回数
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    #[must_use]
    pub fn dictionary(&self) -> &DictionaryTable {
        &self.inner.table
    }

    /// 2 つのハンドルが同じストアを指すか
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for TranslationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationStore")
            .field("active", &*self.inner.active.borrow())
            .field("languages", &self.inner.table.len())
            .field("version", &self.inner.version.get())
            .field("notifier", &self.inner.notifier)
            .finish_non_exhaustive()
    }
}
