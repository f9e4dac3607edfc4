// Business domains
pub mod auth;
pub mod dictionary;
pub mod favorites;
pub mod history;
pub mod member;
pub mod moderation;
pub mod recognition;
pub mod reports;
