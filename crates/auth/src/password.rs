//! One-way password hashing (argon2id, salted).
//!
//! Both functions are deliberately expensive; async callers should run them on
//! a blocking thread.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

use estate_core::DomainError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password hash is not a valid PHC string: {0}")]
    CorruptHash(String),
}

impl From<PasswordError> for DomainError {
    fn from(value: PasswordError) -> Self {
        DomainError::internal(value.to_string())
    }
}

/// Hash a plaintext password into a PHC string with a fresh random salt.
pub fn hash(plaintext: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check `plaintext` against a stored hash.
///
/// The digest comparison inside argon2 is constant-time.
pub fn matches(stored_hash: &str, plaintext: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| PasswordError::CorruptHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok())
}

/// Hash of a throwaway password, built once, so a lookup miss can pay the same
/// verification cost as a real mismatch.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| hash("estate-dummy-password").ok());

/// Run a full verification that never succeeds.
///
/// Callers use this when no stored hash exists, so the response time does not
/// reveal whether the account exists.
pub fn verify_against_dummy(plaintext: &str) {
    if let Some(stored) = DUMMY_HASH.as_deref() {
        let _ = matches(stored, plaintext);
    }
}
