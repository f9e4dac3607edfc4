use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::MemberId;

/// Member model - SQL persistence layer
#[derive(sqlx::FromRow, Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Find member by ID
    pub async fn find_by_id(id: MemberId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn exists(id: MemberId, pool: &PgPool) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    /// Create a member
    pub async fn create(username: &str, is_admin: bool, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO members (id, username, is_admin)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(MemberId::new())
        .bind(username)
        .bind(is_admin)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Count total members
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
