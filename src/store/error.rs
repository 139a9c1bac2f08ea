//! Store error definitions.

use thiserror::Error;

use crate::types::LanguageCode;

/// Errors raised while setting up a [`super::TranslationStore`].
///
/// Store operations themselves never fail; these only cover construction
/// and global installation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Dictionary table has no languages")]
    EmptyDictionary,

    #[error("Initial language '{0}' is not in the dictionary table")]
    UnknownLanguage(LanguageCode),

    #[error("A translation store is already installed on this thread")]
    AlreadyInstalled,
}
