//! Moderation domain actions - business logic functions
//!
//! Every approval attempt is terminal: the contribution ends APPROVED or
//! REJECTED, never PENDING, whatever went wrong.

mod queries;
mod review;
mod submit;

pub use queries::{count_by_status, get_by_id, get_by_status, get_dashboard_stats};
pub use review::{approve_contribution, reject_contribution, ApprovedContribution};
pub use submit::submit_contribution;
