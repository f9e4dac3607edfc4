use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::common::{ContributionId, MemberId};

/// Contribution - a user-submitted dictionary entry awaiting moderation
///
/// Kept forever as an audit trail. Only the moderation actions change `status`,
/// and only ever away from `pending`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contribution {
    pub id: ContributionId,
    pub member_id: MemberId,
    pub staging_data: String, // serialized StagingPayload
    pub status: String,       // 'pending', 'approved', 'rejected'
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contribution status enum
///
/// Stored lowercase; presented uppercase to API clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContributionStatus {
    Pending,
    Approved,
    Rejected,
}

impl ContributionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ContributionStatus::Pending)
    }
}

impl std::fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContributionStatus::Pending => write!(f, "pending"),
            ContributionStatus::Approved => write!(f, "approved"),
            ContributionStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ContributionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ContributionStatus::Pending),
            "approved" => Ok(ContributionStatus::Approved),
            "rejected" => Ok(ContributionStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid contribution status: {}", s)),
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Contribution {
    pub fn status(&self) -> Result<ContributionStatus> {
        self.status.parse()
    }

    /// Stage a new contribution as pending
    pub async fn create(member_id: MemberId, staging_data: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO contributions (id, member_id, staging_data, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(ContributionId::new())
        .bind(member_id)
        .bind(staging_data)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ContributionId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM contributions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Lock the contribution for the rest of the transaction, if it is still pending.
    ///
    /// Filtering on status inside the lock is what serializes a concurrent
    /// approve/reject: the loser sees no row once the winner commits.
    pub async fn find_pending_for_update(
        id: ContributionId,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM contributions WHERE id = $1 AND status = 'pending' FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(Into::into)
    }

    /// Compare-and-swap out of `pending`.
    ///
    /// Returns `None` when the contribution is missing or already terminal.
    pub async fn transition<'e, E>(
        id: ContributionId,
        to: ContributionStatus,
        executor: E,
    ) -> Result<Option<Self>>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE contributions
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(to.to_string())
        .fetch_optional(executor)
        .await
        .map_err(Into::into)
    }

    /// Newest first
    pub async fn find_by_status(status: ContributionStatus, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM contributions WHERE status = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(status.to_string())
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_by_status(status: ContributionStatus, pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contributions WHERE status = $1")
            .bind(status.to_string())
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
