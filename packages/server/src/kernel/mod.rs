//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod gesture_client;
pub mod scheduled_tasks;
pub mod search_index;
pub mod sync_propagator;
pub mod test_dependencies;
pub mod traits;

/// Maximum number of documents requested from the search index per query.
pub const SEARCH_RESULT_LIMIT: usize = 50;

pub use deps::ServerDeps;
pub use gesture_client::{DisabledGestureRecognizer, GestureServiceClient};
pub use search_index::{DisabledSearchIndex, MeilisearchIndex};
pub use sync_propagator::{propagate, SyncOutcome, SyncPropagator};
pub use test_dependencies::{MockGestureRecognizer, MockSearchIndex, TestDependencies};
pub use traits::*;
