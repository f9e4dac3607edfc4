//! Moderation domain - contribution staging and the PENDING → APPROVED | REJECTED workflow

pub mod actions;
pub mod data;
pub mod models;

pub use data::{ContributionData, DashboardStats};
pub use models::{Contribution, ContributionStatus, StagingPayload};
