use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{DictionaryEntryId, MemberId, ReportId};

/// Report - a member flagging a dictionary entry for admin attention
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Report {
    pub id: ReportId,
    pub member_id: MemberId,
    pub entry_id: DictionaryEntryId,
    pub reason: String,
    pub status: String, // 'open', 'resolved'
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Report status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Open,
    Resolved,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Open => write!(f, "open"),
            ReportStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl std::str::FromStr for ReportStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(ReportStatus::Open),
            "resolved" => Ok(ReportStatus::Resolved),
            _ => Err(anyhow::anyhow!("Invalid report status: {}", s)),
        }
    }
}

impl Report {
    pub async fn create(
        member_id: MemberId,
        entry_id: DictionaryEntryId,
        reason: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO reports (id, member_id, entry_id, reason, status)
            VALUES ($1, $2, $3, $4, 'open')
            RETURNING *
            "#,
        )
        .bind(ReportId::new())
        .bind(member_id)
        .bind(entry_id)
        .bind(reason)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ReportId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Oldest first, so the queue is worked in arrival order
    pub async fn find_by_status(status: ReportStatus, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM reports WHERE status = $1 ORDER BY created_at, id",
        )
        .bind(status.to_string())
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// OPEN → RESOLVED. Returns `None` when missing or already resolved.
    pub async fn resolve(id: ReportId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE reports
            SET status = 'resolved', updated_at = NOW()
            WHERE id = $1 AND status = 'open'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
