//! Errors shared by the credential and listing stores.

use thiserror::Error;

use estate_core::DomainError;

/// Store operation error.
///
/// ## Error Mapping
///
/// | SQLx Error | PostgreSQL Error Code | StoreError |
/// |------------|----------------------|------------|
/// | Database (unique violation) | `23505` | `Duplicate` |
/// | Database (foreign key violation) | `23503` | `NotFound` (referenced row missing) |
/// | Database (check constraint violation) | `23514` | `Invalid` |
/// | Database (other), PoolClosed, Io, Tls, timeouts | N/A | `Unavailable` |
///
/// A stored row that decodes but violates a domain invariant is `Corrupt`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    /// A compare-and-set guard no longer matched the stored row.
    #[error("stale state: {0}")]
    StaleState(String),

    #[error("rejected by store: {0}")]
    Invalid(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt stored row: {0}")]
    Corrupt(String),
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(what) => DomainError::not_found(what),
            StoreError::Duplicate(_) => DomainError::DuplicateSubject,
            StoreError::StaleState(msg) => DomainError::conflict(msg),
            StoreError::Invalid(msg) => DomainError::invalid_input(msg),
            StoreError::Unavailable(msg) => DomainError::store_unavailable(msg),
            StoreError::Corrupt(msg) => DomainError::internal(msg),
        }
    }
}

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Duplicate(msg),
                Some("23503") => StoreError::NotFound(msg),
                Some("23514") => StoreError::Invalid(msg),
                _ => StoreError::Unavailable(msg),
            }
        }
        sqlx::Error::PoolClosed => StoreError::Unavailable(format!("connection pool closed in {operation}")),
        sqlx::Error::PoolTimedOut => StoreError::Unavailable(format!("connection pool timed out in {operation}")),
        sqlx::Error::RowNotFound => StoreError::NotFound(format!("row in {operation}")),
        other => StoreError::Unavailable(format!("sqlx error in {operation}: {other}")),
    }
}
