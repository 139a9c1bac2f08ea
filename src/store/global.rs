//! Per-thread store slot for hosts that want a single ambient instance.
//!
//! The store is `!Send`, so "process-wide" means "the UI thread". Installing
//! is one-shot; there is no way to swap the store once views read from it.

use std::cell::OnceCell;

use super::error::StoreError;
use super::state::TranslationStore;

thread_local! {
    /// Store installed on this thread
    static GLOBAL_STORE: OnceCell<TranslationStore> = const { OnceCell::new() };
}

/// Installs `store` as this thread's store.
///
/// # Errors
/// `StoreError::AlreadyInstalled` if a store was installed before.
pub fn install(store: TranslationStore) -> Result<(), StoreError> {
    GLOBAL_STORE.with(|slot| slot.set(store).map_err(|_| StoreError::AlreadyInstalled))?;
    tracing::debug!("Translation store installed");
    Ok(())
}

/// Handle to the installed store, if any.
#[must_use]
pub fn global() -> Option<TranslationStore> {
    GLOBAL_STORE.with(|slot| slot.get().cloned())
}

/// Translates with the installed store; echoes the key if none is installed.
#[must_use]
pub fn try_translate(key: &str) -> String {
    global().map_or_else(|| key.to_string(), |store| store.translate(key))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::test_utils::greeting_table;

    // Each test runs on its own thread, so every test starts with an empty slot.

    #[rstest]
    fn translate_without_store_echoes_key() {
        assert!(global().is_none());
        assert_eq!(try_translate("greeting"), "greeting");
    }

    #[rstest]
    fn install_once() {
        let store = TranslationStore::new(greeting_table(), "tr").unwrap();

        install(store.clone()).unwrap();

        assert!(global().is_some_and(|g| g.ptr_eq(&store)));
        assert_eq!(try_translate("greeting"), "Merhaba");
    }

    #[rstest]
    fn second_install_fails() {
        install(TranslationStore::new(greeting_table(), "en").unwrap()).unwrap();

        let result = install(TranslationStore::new(greeting_table(), "tr").unwrap());

        assert_eq!(result, Err(StoreError::AlreadyInstalled));
        assert_eq!(try_translate("greeting"), "Hello");
    }
}
