pub mod contribution;
pub mod staging_payload;

pub use contribution::*;
pub use staging_payload::*;
