//! Auth domain - JWT verification for API requests
//!
//! Tokens are issued by the account service; this crate only verifies them.
//! `JwtService::create_token` exists for tests and tooling.

pub mod jwt;

pub use jwt::{Claims, JwtService};
