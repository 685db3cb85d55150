//! Stateless credential issuance and verification (HS256 compact tokens).

use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use estate_core::UserId;

use crate::{Claims, Role, TokenError, validate_claims};

/// Issues and verifies signed, time-limited credentials.
///
/// Holds only the keys derived from the shared secret; it never touches any
/// store. Cheap to share behind an `Arc` and safe for concurrent use.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        // Expiry is checked by `validate_claims` against an explicit `now`, so the
        // library's own time checks are disabled.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, sub: UserId, role: Role) -> Result<String, TokenError> {
        self.issue_at(sub, role, Utc::now())
    }

    /// Issue a credential as if the current time were `now`.
    pub fn issue_at(&self, sub: UserId, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::new(sub, role, now);
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;
        tracing::debug!(subject = %sub, role = %role, "token issued");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a credential against the clock reading `now`.
    ///
    /// Checks run in a fixed order: structure, signature, payload, expiry. A
    /// tampered token is therefore reported as `SignatureInvalid` even when it
    /// is also expired.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        // Everything after the second dot is the signature, so a stray dot there
        // fails verification instead of changing the token's shape.
        let mut segments = token.splitn(3, '.');
        let (Some(header), Some(payload), Some(signature)) = (segments.next(), segments.next(), segments.next())
        else {
            return Err(TokenError::Malformed);
        };
        if header.is_empty() || payload.is_empty() {
            return Err(TokenError::Malformed);
        }

        let signed = &token[..header.len() + 1 + payload.len()];
        let decoded_header = jsonwebtoken::decode_header(&format!("{signed}.")).map_err(|_| TokenError::Malformed)?;
        if decoded_header.alg != Algorithm::HS256 {
            return Err(TokenError::SignatureInvalid);
        }

        let valid = jsonwebtoken::crypto::verify(signature, signed.as_bytes(), &self.decoding, Algorithm::HS256)
            .unwrap_or(false);
        if !valid {
            return Err(TokenError::SignatureInvalid);
        }

        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::Malformed)?
            .claims;

        validate_claims(&claims, now)?;
        Ok(claims)
    }
}
