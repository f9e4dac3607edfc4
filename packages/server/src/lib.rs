// VSL Platform - Dictionary & Moderation Core
//
// Backend core for the Vietnamese Sign Language platform: a dictionary kept in
// Postgres and mirrored into a search index, plus the moderation workflow that
// promotes member contributions into it.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
