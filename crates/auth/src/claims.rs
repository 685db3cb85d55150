use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use estate_core::{DomainError, UserId};

use crate::Role;

/// Fixed credential lifetime.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims carried inside a signed credential.
///
/// Never persisted: constructed at issuance and reconstructed by verification.
/// Timestamps travel as the registered JWT `iat`/`exp` seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier.
    pub sub: UserId,

    pub role: Role,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Claims for a credential issued at `now`, valid for [`TOKEN_TTL_HOURS`].
    pub fn new(sub: UserId, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            sub,
            role,
            issued_at: now,
            expires_at: now + Duration::hours(TOKEN_TTL_HOURS),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<TokenError> for DomainError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Signing(msg) => DomainError::internal(msg),
            other => DomainError::unauthenticated(other.to_string()),
        }
    }
}

/// Deterministically validate the time window of decoded claims.
///
/// Signature verification happens before this in [`crate::TokenService`]; this
/// only checks the claims against `now`. The window is half-open: a token is
/// expired at exactly `expires_at`.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenError::Malformed);
    }
    if now >= claims.expires_at {
        return Err(TokenError::Expired);
    }
    Ok(())
}
