//! Dictionary domain - canonical sign entries, dual-written to Postgres and the search index

pub mod actions;
pub mod data;
pub mod models;

pub use data::DictionaryEntryData;
pub use models::{DictionaryEntry, NewDictionaryEntry};
