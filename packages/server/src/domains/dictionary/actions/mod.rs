//! Dictionary domain actions - business logic functions
//!
//! Reads go to the search index first and fall back to Postgres. Writes commit
//! to Postgres first and hand the committed entry to the sync propagator.

mod queries;
mod search;
mod sync;
mod write;

pub use queries::{get_by_id, get_latest, get_random, list_all, normalize_latest_limit};
pub use search::search;
pub use sync::{rebuild_search_index, reconcile_unsynced};
pub use write::{create_word, delete_word, insert_word, update_word, validate_entry};

/// Used when `getLatest` receives a limit outside `1..=MAX_LATEST_LIMIT`.
pub const DEFAULT_LATEST_LIMIT: i64 = 10;
pub const MAX_LATEST_LIMIT: i64 = 100;
pub const MAX_WORD_LENGTH: usize = 100;
