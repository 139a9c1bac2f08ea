//! Indexer type definitions.

use thiserror::Error;

use crate::config::MatcherError;
use crate::dictionary::DictionaryError;

#[derive(Error, Debug)]
pub enum IndexerError {
    /// Invalid include/exclude pattern
    #[error(transparent)]
    Pattern(#[from] MatcherError),
    /// Merged translations could not be added to the table
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}
