//! Reports domain - member reports against dictionary entries (status transitions only)

pub mod actions;
pub mod models;

pub use models::{Report, ReportStatus};
