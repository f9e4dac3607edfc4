// HTTP routes
pub mod dictionary;
pub mod health;
pub mod member;
pub mod moderation;
pub mod recognition;

pub use health::*;
