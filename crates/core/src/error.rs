//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Error taxonomy shared by every layer of the service.
///
/// Each component returns its own typed error and converts into this enum at the
/// boundary; the HTTP layer maps every variant to exactly one status code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed request body, unrecognized status value, missing field.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Missing, unparseable, expired or badly signed credential.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Valid credential, insufficient role.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Registration collided with an existing email.
    #[error("subject already exists")]
    DuplicateSubject,

    /// Referenced user, house or flat does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Another moderator holds the review claim.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persistence is unreachable (transient).
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Signing or hashing failed; not caused by the caller.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable code for transport layers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::DuplicateSubject => "duplicate_subject",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Internal(_) => "internal",
        }
    }
}
