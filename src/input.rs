//! Input sources for the dictionary table.

pub mod translation;
