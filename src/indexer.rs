//! Locale discovery: builds the dictionary table from a workspace.

pub mod types;
pub mod workspace;

pub use types::IndexerError;
pub use workspace::LocaleIndexer;
