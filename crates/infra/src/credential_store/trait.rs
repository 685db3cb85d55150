use std::sync::Arc;

use async_trait::async_trait;

use estate_auth::{NewUser, User};
use estate_core::UserId;

use crate::store::StoreError;

/// Persists user identity.
///
/// Emails are unique: `create_user` returns [`StoreError::Duplicate`] on a
/// collision. Lookups return [`StoreError::NotFound`] when nothing matches.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, id: UserId) -> Result<User, StoreError>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        (**self).create_user(user).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        (**self).find_user_by_email(email).await
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<User, StoreError> {
        (**self).find_user_by_id(id).await
    }
}
