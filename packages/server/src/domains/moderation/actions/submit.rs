use tracing::info;

use crate::common::{MemberId, ServiceError, ServiceResult};
use crate::domains::member::Member;
use crate::domains::moderation::models::{Contribution, StagingPayload};
use crate::kernel::ServerDeps;

/// Stage a member's candidate entry as PENDING.
///
/// The payload is validated and normalized before it is stored, so approval
/// only fails on payloads that were corrupted after submission.
pub async fn submit_contribution(
    member_id: MemberId,
    payload: StagingPayload,
    deps: &ServerDeps,
) -> ServiceResult<Contribution> {
    if !Member::exists(member_id, &deps.db_pool).await? {
        return Err(ServiceError::not_found("Member", member_id));
    }

    let normalized = StagingPayload::from(payload.into_entry()?);
    let contribution =
        Contribution::create(member_id, &normalized.to_json()?, &deps.db_pool).await?;

    info!(
        contribution_id = %contribution.id,
        member_id = %member_id,
        word = %normalized.word,
        "Contribution submitted"
    );
    Ok(contribution)
}
