//! Translation store, its change notifier and component bindings.

pub mod binding;
pub mod error;
pub mod global;
pub mod initial;
/// Subscriber registry behind the store
mod notifier;
pub mod state;

pub use binding::{
    Binding,
    Localized,
    RedrawRequests,
    RenderTrigger,
    TranslatedLabels,
};
pub use error::StoreError;
pub use initial::{
    match_language,
    parse_accept_language,
    resolve_initial_language,
};
pub use notifier::{
    SubscriberId,
    Subscription,
};
pub use state::TranslationStore;

use crate::config::I18nSettings;
use crate::dictionary::DictionaryTable;

/// Builds a store whose initial language is resolved from `preferred`,
/// `hints` and `settings`.
///
/// # Errors
/// `StoreError::EmptyDictionary` if `table` has no languages.
pub fn build_store(
    table: DictionaryTable,
    preferred: Option<&str>,
    hints: &[String],
    settings: &I18nSettings,
) -> Result<TranslationStore, StoreError> {
    let initial = resolve_initial_language(&table, preferred, hints, settings)
        .ok_or(StoreError::EmptyDictionary)?;
    TranslationStore::new(table, initial.as_str())
}
