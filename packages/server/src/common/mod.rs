// Common types and utilities shared across the application

pub mod entity_ids;
pub mod errors;
pub mod id;

pub use entity_ids::*;
pub use errors::{is_duplicate_key, is_unique_violation, ServiceError, ServiceResult};
pub use id::Id;
