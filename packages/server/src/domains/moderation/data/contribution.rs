//! Contribution representation returned to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ContributionId, MemberId};
use crate::domains::moderation::models::{Contribution, ContributionStatus, StagingPayload};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionData {
    pub id: ContributionId,
    pub member_id: MemberId,
    pub status: Option<ContributionStatus>,
    /// `None` when the stored staging data cannot be parsed
    pub payload: Option<StagingPayload>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contribution> for ContributionData {
    fn from(contribution: Contribution) -> Self {
        Self {
            id: contribution.id,
            member_id: contribution.member_id,
            status: contribution.status().ok(),
            payload: StagingPayload::parse(&contribution.staging_data).ok(),
            created_at: contribution.created_at,
            updated_at: contribution.updated_at,
        }
    }
}
