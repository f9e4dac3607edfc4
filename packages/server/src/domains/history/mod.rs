//! Search history domain - dictionary lookups made by signed-in members

pub mod actions;
pub mod models;

pub use models::{SearchHistory, SearchHistoryEntry};
