//! Registration, password login and synthetic (dummy) login.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use estate_auth::user::normalize_email;
use estate_auth::{NewUser, Role, TokenService, User, password};
use estate_core::{DomainError, UserId};

use crate::credential_store::CredentialStore;
use crate::store::StoreError;

/// Every login failure reads the same to the caller, whether the user is
/// unknown or the password is wrong.
const BAD_CREDENTIALS: &str = "user not found or password mismatch";

#[derive(Debug, Clone)]
pub struct AccountService<S> {
    store: S,
    tokens: Arc<TokenService>,
}

impl<S> AccountService<S>
where
    S: CredentialStore,
{
    pub fn new(store: S, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create a user. A repeated email yields `DuplicateSubject`.
    #[instrument(skip(self, email, password), err)]
    pub async fn register(&self, email: &str, password: &str, role: Role) -> Result<User, DomainError> {
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(DomainError::invalid_input("password is required"));
        }

        let password_hash = hash_off_thread(password.to_string()).await?;

        let user = self
            .store
            .create_user(NewUser {
                email,
                password_hash,
                role,
            })
            .await
            .map_err(|err| {
                if let StoreError::Duplicate(_) = err {
                    warn!("registration rejected: email already registered");
                }
                DomainError::from(err)
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verify a password and issue a token.
    ///
    /// `identifier` is either a user id or an email address.
    #[instrument(skip(self, identifier, password), err)]
    pub async fn login(&self, identifier: &str, password: &str) -> Result<String, DomainError> {
        let identifier = identifier.trim();
        let found = match identifier.parse::<UserId>() {
            Ok(id) => self.store.find_user_by_id(id).await,
            Err(_) => self.store.find_user_by_email(identifier).await,
        };

        let user = match found {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => {
                burn_verify_off_thread(password.to_string()).await?;
                warn!("login rejected: unknown user");
                return Err(DomainError::not_found(BAD_CREDENTIALS));
            }
            Err(err) => return Err(err.into()),
        };

        if !verify_off_thread(user.password_hash.clone(), password.to_string()).await? {
            warn!(user_id = %user.id, "login rejected: password mismatch");
            return Err(DomainError::not_found(BAD_CREDENTIALS));
        }

        let token = self.tokens.issue(user.id, user.role)?;
        debug!(user_id = %user.id, "token issued");
        Ok(token)
    }

    /// Issue a token for a fresh synthetic subject without any password check.
    #[instrument(skip(self), err)]
    pub fn dummy_login(&self, role: Role) -> Result<String, DomainError> {
        let subject = UserId::new();
        let token = self.tokens.issue(subject, role)?;
        debug!(subject = %subject, "dummy token issued");
        Ok(token)
    }
}

async fn hash_off_thread(plaintext: String) -> Result<String, DomainError> {
    tokio::task::spawn_blocking(move || password::hash(&plaintext))
        .await
        .map_err(|e| DomainError::internal(format!("hashing task failed: {e}")))?
        .map_err(DomainError::from)
}

async fn verify_off_thread(stored_hash: String, plaintext: String) -> Result<bool, DomainError> {
    tokio::task::spawn_blocking(move || password::matches(&stored_hash, &plaintext))
        .await
        .map_err(|e| DomainError::internal(format!("verification task failed: {e}")))?
        .map_err(DomainError::from)
}

async fn burn_verify_off_thread(plaintext: String) -> Result<(), DomainError> {
    tokio::task::spawn_blocking(move || password::verify_against_dummy(&plaintext))
        .await
        .map_err(|e| DomainError::internal(format!("verification task failed: {e}")))
}
