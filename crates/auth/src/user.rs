//! Registered user record (owned by the credential store).

use chrono::{DateTime, Utc};
use serde::Serialize;

use estate_core::{DomainError, UserId};

use crate::Role;

/// A registered user. Immutable after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// PHC-formatted argon2 hash; never the plaintext.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Registration input after the password has been hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Normalize and check an email address used as a login identifier.
///
/// Only trims and checks for a plausible `local@domain` shape; uniqueness is the
/// store's concern.
pub fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(DomainError::invalid_input("email is required"));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email.to_string()),
        _ => Err(DomainError::invalid_input(format!("'{email}' is not an email address"))),
    }
}
