use thiserror::Error;

/// Errors surfaced by dictionary, moderation and member-facing actions.
///
/// Search-index failures never appear here on the read path; they are
/// recovered by the primary-store fallback.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Word already exists: {0}")]
    DuplicateWord(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid staging payload: {0}")]
    InvalidPayload(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("External service unavailable: {0}")]
    ExternalServiceUnavailable(String),

    #[error("External service error ({status}): {message}")]
    ExternalService { status: u16, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// True when a sqlx error is a Postgres unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

/// Same check for model errors, which arrive wrapped in `anyhow`.
pub fn is_duplicate_key(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .map(is_unique_violation)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("Contribution", 42);
        assert_eq!(err.to_string(), "Contribution not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_row_not_found_is_not_a_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
        assert!(!is_duplicate_key(&anyhow::Error::from(sqlx::Error::RowNotFound)));
        assert!(!is_duplicate_key(&anyhow::anyhow!("plain failure")));
    }
}
