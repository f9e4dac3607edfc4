//! Member domain - the accounts that own contributions, favorites and reports
//!
//! Account lifecycle (registration, passwords, profiles) is handled elsewhere;
//! this domain only resolves and counts members.

pub mod models;

pub use models::member::Member;
