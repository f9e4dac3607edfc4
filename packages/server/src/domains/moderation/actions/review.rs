//! Approve / reject actions for staged contributions.

use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::{error, info, warn};

use crate::common::{ContributionId, ServiceError, ServiceResult};
use crate::domains::dictionary::actions::insert_word;
use crate::domains::dictionary::models::DictionaryEntry;
use crate::domains::moderation::models::{Contribution, ContributionStatus, StagingPayload};
use crate::kernel::ServerDeps;

/// Result of a successful approval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovedContribution {
    pub contribution: Contribution,
    pub entry: DictionaryEntry,
}

/// Promote a PENDING contribution into the dictionary.
///
/// The status lock, the dictionary insert and the APPROVED update share one
/// transaction. On any failure after the contribution was found pending, the
/// transaction is rolled back and the contribution is moved to REJECTED
/// before the original error is returned. A duplicate word is reported as
/// `DuplicateWord`.
///
/// Runs detached from the caller: once started, the approval, the fail-safe
/// rejection and the propagation hand-off all happen even if the caller is
/// dropped.
pub async fn approve_contribution(
    id: ContributionId,
    deps: &ServerDeps,
) -> ServiceResult<ApprovedContribution> {
    deps.run_detached(move |deps| async move { approve(id, &deps).await })
        .await
}

async fn approve(id: ContributionId, deps: &ServerDeps) -> ServiceResult<ApprovedContribution> {
    let mut tx = deps.db_pool.begin().await?;

    let pending = match Contribution::find_pending_for_update(id, &mut tx).await? {
        Some(contribution) => contribution,
        None => {
            tx.rollback().await?;
            return Err(not_pending_error(id, deps).await);
        }
    };

    let promoted = match promote(&pending, &mut tx).await {
        Ok(approved) => tx.commit().await.map(|_| approved).map_err(ServiceError::from),
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(contribution_id = %id, error = %rollback_err, "Rollback after failed approval failed");
            }
            Err(e)
        }
    };

    match promoted {
        Ok(approved) => {
            info!(
                contribution_id = %id,
                entry_id = %approved.entry.id,
                word = %approved.entry.word,
                "Contribution approved"
            );
            deps.sync.schedule(approved.entry.clone());
            Ok(approved)
        }
        Err(e) => {
            reject_after_failed_approval(id, &e, deps).await;
            Err(e)
        }
    }
}

/// Steps that run inside the approval transaction.
async fn promote(
    pending: &Contribution,
    conn: &mut PgConnection,
) -> ServiceResult<ApprovedContribution> {
    let input = StagingPayload::parse(&pending.staging_data)?.into_entry()?;
    let entry = insert_word(&input, &mut *conn).await?;

    let contribution =
        Contribution::transition(pending.id, ContributionStatus::Approved, &mut *conn)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidState(format!(
                    "Contribution {} left pending state during approval",
                    pending.id
                ))
            })?;

    Ok(ApprovedContribution {
        contribution,
        entry,
    })
}

/// Fail-safe: an approval attempt never leaves the contribution pending.
async fn reject_after_failed_approval(id: ContributionId, cause: &ServiceError, deps: &ServerDeps) {
    match Contribution::transition(id, ContributionStatus::Rejected, &deps.db_pool).await {
        Ok(Some(_)) => match cause {
            ServiceError::DuplicateWord(word) => {
                warn!(contribution_id = %id, word = %word, "Contribution rejected: word already exists")
            }
            _ => {
                error!(contribution_id = %id, error = %cause, "Approval failed, contribution rejected")
            }
        },
        Ok(None) => {
            warn!(contribution_id = %id, error = %cause, "Approval failed and contribution is no longer pending")
        }
        Err(e) => error!(
            contribution_id = %id,
            error = %e,
            cause = %cause,
            "Approval failed and the contribution could not be rejected"
        ),
    }
}

/// Reject a PENDING contribution.
pub async fn reject_contribution(id: ContributionId, deps: &ServerDeps) -> ServiceResult<Contribution> {
    match Contribution::transition(id, ContributionStatus::Rejected, &deps.db_pool).await? {
        Some(contribution) => {
            info!(contribution_id = %id, "Contribution rejected");
            Ok(contribution)
        }
        None => Err(not_pending_error(id, deps).await),
    }
}

/// Explain why a contribution could not be moved out of PENDING.
async fn not_pending_error(id: ContributionId, deps: &ServerDeps) -> ServiceError {
    match Contribution::find_by_id(id, &deps.db_pool).await {
        Ok(Some(contribution)) => ServiceError::InvalidState(format!(
            "Contribution {} is {}, only pending contributions can be reviewed",
            id, contribution.status
        )),
        Ok(None) => ServiceError::not_found("Contribution", id),
        Err(e) => ServiceError::Internal(e),
    }
}
